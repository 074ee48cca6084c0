//! Customer resource.
//!
//! POST behaves as an upsert-like update of the resolved customer, so
//! anonymous checkout flows can fill in their details. Non-superusers
//! are scoped to their own customer record on every verb.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::{AppState, RequestContext};
use crate::config::ROLE_ADMIN;
use crate::errors::{AppError, AppResult};
use crate::infra::entities::customer;
use crate::resource::{FilterSchema, Guard, Identity, MethodGuards, SqlResource, Verb};
use crate::services::customers;
use crate::types::ListEnvelope;

type Customers = SqlResource<customer::Entity, customer::ActiveModel>;

const GUARDS: MethodGuards = MethodGuards {
    get: &[],
    post: &[],
    put: &[Guard::LoginRequired],
    delete: &[Guard::LoginRequired, Guard::RoleRequired(ROLE_ADMIN)],
};

const FILTERS: FilterSchema = FilterSchema::EMPTY;

/// Customer payload; optional fields absent from the body stay untouched.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CustomerRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Public customer view.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub fax: Option<String>,
    pub company: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            notes: model.notes,
            fax: model.fax,
            company: model.company,
            gender: model.gender,
            created_at: model.created_at,
        }
    }
}

/// Create customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(upsert_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Resolve the caller's customer record.
async fn own_customer(state: &AppState, ctx: &RequestContext) -> AppResult<customer::Model> {
    customers::resolve_customer(
        state.db(),
        ctx.user_model(),
        ctx.session_customer_id().await?,
        None,
    )
    .await
}

/// Non-superusers only ever address their own customer.
fn scope_for(ctx: &RequestContext, own_id: i64) -> Condition {
    if ctx.is_superuser() {
        Condition::all()
    } else {
        Condition::all().add(customer::Column::Id.eq(own_id))
    }
}

/// List customers, scoped to the caller unless superuser
#[utoipa::path(
    get,
    path = "/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "List envelope of customers"),
        (status = 400, description = "No customer context")
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<ListEnvelope<CustomerResponse>>> {
    GUARDS.enforce(Verb::Get, &ctx)?;

    let args = FILTERS.clean(&query);
    let own = own_customer(&state, &ctx).await?;

    let resources = Customers::new(state.db().clone());
    let slice = resources
        .page_scoped(scope_for(&ctx, own.id), &args.filters, args.page)
        .await?;

    Ok(Json(ListEnvelope::from_slice(slice, CustomerResponse::from)))
}

/// Fetch one customer within the caller's scope
#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 404, description = "Outside the caller's scope")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<CustomerResponse>> {
    GUARDS.enforce(Verb::Get, &ctx)?;

    let own = own_customer(&state, &ctx).await?;
    let resources = Customers::new(state.db().clone());
    let found = resources.fetch_one_scoped(id, scope_for(&ctx, own.id)).await?;

    Ok(Json(found.into()))
}

/// Update the resolved customer in place
#[utoipa::path(
    post,
    path = "/customers",
    tag = "Customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failure or no customer context")
    )
)]
pub async fn upsert_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<CustomerRequest>,
) -> AppResult<(StatusCode, Json<CustomerResponse>)> {
    GUARDS.enforce(Verb::Post, &ctx)?;

    let own = own_customer(&state, &ctx).await?;
    let resources = Customers::new(state.db().clone());
    let updated = resources.update(own.id, update_data(&payload)?).await?;

    Ok((StatusCode::CREATED, Json(updated.into())))
}

/// Update a customer by id
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = CustomerRequest,
    responses(
        (status = 202, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Outside the caller's scope")
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CustomerRequest>,
) -> AppResult<(StatusCode, Json<CustomerResponse>)> {
    GUARDS.enforce(Verb::Put, &ctx)?;

    let own = own_customer(&state, &ctx).await?;
    let resources = Customers::new(state.db().clone());

    let found = resources.fetch_one_scoped(id, scope_for(&ctx, own.id)).await?;
    let updated = resources.update(found.id, update_data(&payload)?).await?;

    Ok((StatusCode::ACCEPTED, Json(updated.into())))
}

/// Delete a customer (admin role)
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Outside the caller's scope")
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    GUARDS.enforce(Verb::Delete, &ctx)?;

    let own = own_customer(&state, &ctx).await?;
    let resources = Customers::new(state.db().clone());

    let found = resources.fetch_one_scoped(id, scope_for(&ctx, own.id)).await?;
    resources.delete(found.id).await?;

    Ok(Json(serde_json::json!({})))
}

fn update_data(payload: &CustomerRequest) -> AppResult<serde_json::Value> {
    let mut data =
        serde_json::to_value(payload).map_err(|e| AppError::internal(e.to_string()))?;
    data["updated_at"] = serde_json::json!(Utc::now());
    Ok(data)
}
