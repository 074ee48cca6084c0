//! Profile resource.
//!
//! Registration happens on the session resource, so POST is statically
//! disabled here. Reads are viewer-sensitive: the serialized view never
//! includes the password and only includes the email for the profile
//! owner or a superuser.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, EntityTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::{AppState, AuthedUser, RequestContext};
use crate::config::MIN_PASSWORD_LENGTH;
use crate::domain::Password;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::entities::{role, user};
use crate::resource::{FilterSchema, Guard, Identity, MethodGuards, SqlResource, Verb};
use crate::services::account;
use crate::types::ListEnvelope;

type Users = SqlResource<user::Entity, user::ActiveModel>;

const GUARDS: MethodGuards = MethodGuards {
    get: &[],
    post: &[],
    put: &[Guard::LoginRequired],
    delete: &[],
};

const FILTERS: FilterSchema = FilterSchema::EMPTY;

/// Substring-searchable columns on the list endpoint.
const SEARCH_FIELDS: &[(&str, user::Column)] = &[
    ("first_name", user::Column::FirstName),
    ("last_name", user::Column::LastName),
    ("email", user::Column::Email),
];

/// Profile update payload; the password sub-schema requires both fields.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub phone: String,
    /// Role to attach; superusers only, unless already held
    pub role_id: Option<i64>,
    pub password: Option<String>,
    pub confirmation: Option<String>,
}

/// Email-confirmation token carried in a GET body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConfirmationRequest {
    pub token: Option<String>,
}

/// Viewer-dependent public profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileView {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub is_superuser: bool,
    pub logged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Visible to the owner and superusers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileView {
    pub fn render(viewer: Option<&AuthedUser>, target: &user::Model) -> Self {
        let email_visible = viewer
            .map(|caller| caller.id() == target.id || caller.is_superuser())
            .unwrap_or(false);

        Self {
            id: target.id,
            first_name: target.first_name.clone(),
            last_name: target.last_name.clone(),
            phone: target.phone.clone(),
            active: target.active,
            is_superuser: target.is_superuser,
            logged_at: target.logged_at,
            created_at: target.created_at,
            email: email_visible.then(|| target.email.clone()),
        }
    }
}

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_disabled))
        .route("/:id", get(get_profile).put(update_profile))
}

/// List profiles with substring search
#[utoipa::path(
    get,
    path = "/profiles",
    tag = "Profiles",
    responses((status = 200, description = "List envelope of profiles"))
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<ListEnvelope<ProfileView>>> {
    GUARDS.enforce(Verb::Get, &ctx)?;

    let args = FILTERS.clean(&query);

    let mut search = Condition::any();
    for (key, column) in SEARCH_FIELDS {
        if let Some(needle) = query.get(*key) {
            search = search.add(column.contains(needle.as_str()));
        }
    }

    let users = Users::new(state.db().clone());
    let slice = users.page_scoped(search, &args.filters, args.page).await?;

    Ok(Json(ListEnvelope::from_slice(slice, |found| {
        ProfileView::render(ctx.user.as_ref(), &found)
    })))
}

/// Fetch one profile, or complete an email-confirmation token
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "Profiles",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = ProfileView),
        (status = 404, description = "No visible profile")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    body: Option<Json<ConfirmationRequest>>,
) -> AppResult<Json<ProfileView>> {
    GUARDS.enforce(Verb::Get, &ctx)?;

    // A valid token confirms the account and logs the session in,
    // even as a side effect of a read.
    if let Some(token) = body.and_then(|Json(request)| request.token) {
        let confirmed = account::confirm_email(state.db(), &ctx.session, &token).await?;
        let viewer = AuthedUser {
            user: confirmed.clone(),
            roles: Vec::new(),
        };
        return Ok(Json(ProfileView::render(Some(&viewer), &confirmed)));
    }

    let users = Users::new(state.db().clone());
    let target = if ctx.is_superuser() {
        users.fetch_one(id).await?
    } else if let Some(authed) = &ctx.user {
        // Non-superusers only ever see themselves.
        authed.user.clone()
    } else {
        return Err(AppError::NotFound);
    };

    Ok(Json(ProfileView::render(ctx.user.as_ref(), &target)))
}

/// Registration lives on the session resource
#[utoipa::path(
    post,
    path = "/profiles",
    tag = "Profiles",
    responses((status = 405, description = "Always"))
)]
pub async fn create_disabled() -> AppResult<()> {
    Err(AppError::MethodNotAllowed)
}

/// Update profile fields, password, and optionally roles
#[utoipa::path(
    put,
    path = "/profiles/{id}",
    tag = "Profiles",
    params(("id" = i64, Path, description = "User id")),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 202, description = "Updated", body = ProfileView),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Role change not allowed")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ProfileUpdateRequest>,
) -> AppResult<(StatusCode, Json<ProfileView>)> {
    GUARDS.enforce(Verb::Put, &ctx)?;

    let users = Users::new(state.db().clone());
    let caller = ctx.current_user()?;

    let target = if caller.is_superuser() {
        users.fetch_one(id).await?
    } else {
        caller.user.clone()
    };

    if let Some(role_id) = payload.role_id {
        let role = role::Entity::find_by_id(role_id)
            .one(state.db())
            .await?
            .ok_or_not_found()?;
        if !account::user_has_role(state.db(), target.id, role.id).await? {
            if caller.is_superuser() {
                account::grant_role(state.db(), target.id, &role).await?;
            } else {
                return Err(AppError::Forbidden);
            }
        }
    }

    let mut data = serde_json::json!({
        "first_name": payload.first_name,
        "last_name": payload.last_name,
        "phone": payload.phone,
        "updated_at": Utc::now(),
    });
    if let Some(hash) = changed_password(&payload)? {
        data["password"] = serde_json::Value::String(hash);
    }

    let updated = users.update(target.id, data).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ProfileView::render(ctx.user.as_ref(), &updated)),
    ))
}

/// Resolve the password sub-schema: both fields or neither, minimum
/// length, and matching confirmation.
fn changed_password(payload: &ProfileUpdateRequest) -> AppResult<Option<String>> {
    match (&payload.password, &payload.confirmation) {
        (None, None) => Ok(None),
        (Some(password), Some(confirmation)) => {
            if password.len() < MIN_PASSWORD_LENGTH {
                Err(AppError::field(
                    "password",
                    "Passwords should be more than 6 symbols length",
                ))
            } else if password != confirmation {
                Err(AppError::field("confirmation", "Passwords doesn't match"))
            } else {
                Ok(Some(Password::new(password)?.into_string()))
            }
        }
        _ => Err(AppError::field(
            "confirmation",
            "Password and confirmation are both required",
        )),
    }
}
