//! Session resource: the Anonymous <-> Authenticated state machine.
//!
//! POST registers, PUT authenticates, DELETE logs out. Every verb answers
//! with the session snapshot. Authentication failures, including malformed
//! input, are reported as 404 with a field mapping; registration uses 400
//! for the same class of error.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{field_errors, ValidatedJson};
use crate::api::{AppState, RequestContext};
use crate::domain::SessionSnapshot;
use crate::errors::{AppError, AppResult};
use crate::services::account;

/// Credentials accepted by both register and authenticate.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Optional password; registration falls back to a placeholder
    pub password: Option<String>,
}

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(current).post(register))
        .route("/:id", get(current_by_id).put(authenticate).delete(logout))
}

fn snapshot_of(ctx: &RequestContext) -> SessionSnapshot {
    SessionSnapshot::new(ctx.session_id(), ctx.user.as_ref().map(|authed| authed.id()))
}

/// Current session state
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "Sessions",
    responses((status = 200, description = "Session snapshot", body = SessionSnapshot))
)]
pub async fn current(ctx: RequestContext) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(snapshot_of(&ctx)))
}

/// Same snapshot; the id path parameter is accepted for routing symmetry
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "Sessions",
    params(("id" = String, Path, description = "Ignored session id")),
    responses((status = 200, description = "Session snapshot", body = SessionSnapshot))
)]
pub async fn current_by_id(
    ctx: RequestContext,
    Path(_id): Path<String>,
) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(snapshot_of(&ctx)))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "Sessions",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account registered", body = SessionSnapshot),
        (status = 400, description = "Validation failure or duplicate email")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<SessionSnapshot>)> {
    account::register(state.db(), &payload.email, payload.password.as_deref()).await?;

    // Registration does not authenticate the session.
    Ok((StatusCode::CREATED, Json(snapshot_of(&ctx))))
}

/// Authenticate the session
#[utoipa::path(
    put,
    path = "/sessions/{id}",
    tag = "Sessions",
    params(("id" = String, Path, description = "Ignored session id")),
    request_body = CredentialsRequest,
    responses(
        (status = 202, description = "Authenticated", body = SessionSnapshot),
        (status = 404, description = "Unknown credentials or invalid input")
    )
)]
pub async fn authenticate(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(_id): Path<String>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SessionSnapshot>)> {
    // Every expected failure on this verb answers 404, not 400.
    let Json(credentials) = payload.map_err(|e| {
        AppError::field("body", e.body_text()).into_lookup_failed()
    })?;
    credentials
        .validate()
        .map_err(|e| AppError::Validation(field_errors(&e)).into_lookup_failed())?;

    let account = account::authenticate(
        state.db(),
        &ctx.session,
        &credentials.email,
        credentials.password.as_deref().unwrap_or_default(),
    )
    .await?;

    let snapshot = SessionSnapshot::new(ctx.session_id(), Some(account.id));
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Log out, returning the now-anonymous snapshot
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "Sessions",
    params(("id" = String, Path, description = "Ignored session id")),
    responses((status = 204, description = "Logged out", body = SessionSnapshot))
)]
pub async fn logout(
    ctx: RequestContext,
    Path(_id): Path<String>,
) -> AppResult<(StatusCode, Json<SessionSnapshot>)> {
    account::logout(&ctx.session).await?;

    let snapshot = SessionSnapshot::new(ctx.session_id(), None);
    Ok((StatusCode::NO_CONTENT, Json(snapshot)))
}
