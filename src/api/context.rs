//! Per-request context.
//!
//! Built once per inbound request: the session handle, the authenticated
//! user (with role names), and a request id. Handlers receive it
//! explicitly; nothing reads ambient globals.

use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tower_sessions::Session;
use uuid::Uuid;

use crate::config::{SESSION_CUSTOMER_ID, SESSION_USER_ID};
use crate::errors::{AppError, AppResult};
use crate::infra::entities::{role, user, user_role};
use crate::resource::Identity;

use super::AppState;

/// Authenticated caller with resolved role names.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user: user::Model,
    pub roles: Vec<String>,
}

impl AuthedUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn is_superuser(&self) -> bool {
        self.user.is_superuser
    }
}

/// Explicit request-scoped state.
pub struct RequestContext {
    pub session: Session,
    pub user: Option<AuthedUser>,
    pub request_id: Uuid,
}

impl RequestContext {
    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }

    /// The authenticated caller, or 401.
    pub fn current_user(&self) -> AppResult<&AuthedUser> {
        self.user.as_ref().ok_or(AppError::Unauthorized)
    }

    pub fn user_model(&self) -> Option<&user::Model> {
        self.user.as_ref().map(|authed| &authed.user)
    }

    /// The customer id carried by the session, if any.
    pub async fn session_customer_id(&self) -> AppResult<Option<i64>> {
        self.session
            .get::<i64>(SESSION_CUSTOMER_ID)
            .await
            .map_err(Into::into)
    }

    pub fn session_id(&self) -> Option<String> {
        self.session.id().map(|id| id.to_string())
    }
}

impl Identity for RequestContext {
    fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn is_superuser(&self) -> bool {
        self.user
            .as_ref()
            .map(AuthedUser::is_superuser)
            .unwrap_or(false)
    }

    fn has_role(&self, role: &str) -> bool {
        self.user
            .as_ref()
            .map(|authed| authed.roles.iter().any(|held| held == role))
            .unwrap_or(false)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::internal(message))?;

        let user = match session.get::<i64>(SESSION_USER_ID).await? {
            Some(user_id) => load_authed_user(state, user_id).await?,
            None => None,
        };

        Ok(Self {
            session,
            user,
            request_id: Uuid::new_v4(),
        })
    }
}

async fn load_authed_user(state: &AppState, user_id: i64) -> AppResult<Option<AuthedUser>> {
    let Some(account) = user::Entity::find_by_id(user_id).one(state.db()).await? else {
        return Ok(None);
    };

    let role_ids: Vec<i64> = user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(account.id))
        .all(state.db())
        .await?
        .into_iter()
        .map(|link| link.role_id)
        .collect();

    let roles = if role_ids.is_empty() {
        Vec::new()
    } else {
        role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .all(state.db())
            .await?
            .into_iter()
            .map(|held| held.name)
            .collect()
    };

    Ok(Some(AuthedUser {
        user: account,
        roles,
    }))
}
