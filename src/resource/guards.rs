//! Per-verb authorization chains.
//!
//! Each resource declares its guard table statically; the chain for a
//! verb runs in order before any handler logic. A verb with no guards
//! dispatches directly.

use crate::errors::{AppError, AppResult};

/// What a guard needs to know about the caller.
pub trait Identity {
    fn is_authenticated(&self) -> bool;
    fn is_superuser(&self) -> bool;
    fn has_role(&self, role: &str) -> bool;
}

/// A single authorization requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    LoginRequired,
    RoleRequired(&'static str),
    SuperuserRequired,
}

impl Guard {
    pub fn check(&self, who: &dyn Identity) -> AppResult<()> {
        match self {
            Guard::LoginRequired => {
                if who.is_authenticated() {
                    Ok(())
                } else {
                    Err(AppError::Unauthorized)
                }
            }
            Guard::RoleRequired(role) => {
                if !who.is_authenticated() {
                    Err(AppError::Unauthorized)
                } else if who.has_role(role) || who.is_superuser() {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
            Guard::SuperuserRequired => {
                if !who.is_authenticated() {
                    Err(AppError::Unauthorized)
                } else if who.is_superuser() {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
        }
    }
}

/// HTTP verbs a resource dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

/// Ordered guard lists keyed by verb.
#[derive(Debug, Clone, Copy)]
pub struct MethodGuards {
    pub get: &'static [Guard],
    pub post: &'static [Guard],
    pub put: &'static [Guard],
    pub delete: &'static [Guard],
}

impl MethodGuards {
    /// No authorization on any verb.
    pub const OPEN: MethodGuards = MethodGuards {
        get: &[],
        post: &[],
        put: &[],
        delete: &[],
    };

    /// Login required on every verb.
    pub const AUTHENTICATED: MethodGuards = MethodGuards {
        get: &[Guard::LoginRequired],
        post: &[Guard::LoginRequired],
        put: &[Guard::LoginRequired],
        delete: &[Guard::LoginRequired],
    };

    fn for_verb(&self, verb: Verb) -> &'static [Guard] {
        match verb {
            Verb::Get => self.get,
            Verb::Post => self.post,
            Verb::Put => self.put,
            Verb::Delete => self.delete,
        }
    }

    /// Run the verb's guard chain in declaration order.
    pub fn enforce(&self, verb: Verb, who: &dyn Identity) -> AppResult<()> {
        for guard in self.for_verb(verb) {
            guard.check(who)?;
        }
        Ok(())
    }
}
