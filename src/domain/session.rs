//! Ephemeral session identity.
//!
//! A session is not a persisted entity: it carries `user_id` and
//! `customer_id` keys that bridge anonymous and authenticated flows.
//! The snapshot below is the public view returned by every session verb.

use serde::Serialize;
use utoipa::ToSchema;

/// Public session state: `{id, is_anonymous, uid}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSnapshot {
    /// Session identifier (null until the session has been persisted)
    pub id: Option<String>,
    /// Whether the session lacks an authenticated user
    pub is_anonymous: bool,
    /// Authenticated user's id as a string, null when anonymous
    pub uid: Option<String>,
}

impl SessionSnapshot {
    pub fn new(id: Option<String>, user_id: Option<i64>) -> Self {
        Self {
            id,
            is_anonymous: user_id.is_none(),
            uid: user_id.map(|uid| uid.to_string()),
        }
    }
}
