//! Role resource.
//!
//! Roles are append-only through the API: creation and renaming require
//! the admin role, and deletion is statically forbidden for every
//! caller, superusers included.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::{AppState, RequestContext};
use crate::config::ROLE_ADMIN;
use crate::errors::{AppError, AppResult};
use crate::infra::entities::role;
use crate::resource::{FilterSchema, Guard, MethodGuards, SqlResource, Verb};
use crate::types::ListEnvelope;

type Roles = SqlResource<role::Entity, role::ActiveModel>;

const GUARDS: MethodGuards = MethodGuards {
    get: &[Guard::LoginRequired],
    post: &[Guard::LoginRequired, Guard::RoleRequired(ROLE_ADMIN)],
    put: &[Guard::LoginRequired, Guard::RoleRequired(ROLE_ADMIN)],
    delete: &[Guard::LoginRequired],
};

const FILTERS: FilterSchema = FilterSchema::EMPTY;

/// Role payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoleRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

/// Public role view.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
}

impl From<role::Model> for RoleResponse {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Create role routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
}

/// List roles
#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    responses((status = 200, description = "List envelope of roles"))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<ListEnvelope<RoleResponse>>> {
    GUARDS.enforce(Verb::Get, &ctx)?;

    let args = FILTERS.clean(&query);
    let roles = Roles::new(state.db().clone());
    let slice = roles.paginate(&args.filters, args.page).await?;

    Ok(Json(ListEnvelope::from_slice(slice, RoleResponse::from)))
}

/// Fetch one role
#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role", body = RoleResponse),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<RoleResponse>> {
    GUARDS.enforce(Verb::Get, &ctx)?;

    let roles = Roles::new(state.db().clone());
    Ok(Json(roles.fetch_one(id).await?.into()))
}

/// Create a role (admin)
#[utoipa::path(
    post,
    path = "/roles",
    tag = "Roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<RoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    GUARDS.enforce(Verb::Post, &ctx)?;

    let roles = Roles::new(state.db().clone());
    let created = roles
        .create(serde_json::json!({ "name": payload.name }))
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Rename a role (admin)
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role id")),
    request_body = RoleRequest,
    responses(
        (status = 202, description = "Role updated", body = RoleResponse),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    GUARDS.enforce(Verb::Put, &ctx)?;

    let roles = Roles::new(state.db().clone());
    let updated = roles
        .update(id, serde_json::json!({ "name": payload.name }))
        .await?;

    Ok((StatusCode::ACCEPTED, Json(updated.into())))
}

/// Role removal is forbidden for everyone
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role id")),
    responses((status = 405, description = "Always"))
)]
pub async fn delete_role(ctx: RequestContext, Path(_id): Path<i64>) -> AppResult<()> {
    GUARDS.enforce(Verb::Delete, &ctx)?;
    Err(AppError::MethodNotAllowed)
}
