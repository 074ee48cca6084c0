//! Address resource.
//!
//! Addresses always belong to a customer. The owning customer is the
//! authenticated caller's; anonymous callers must name one through the
//! session or the request itself.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::{AppState, RequestContext};
use crate::errors::{AppError, AppResult};
use crate::infra::entities::address::{self, ADDRESS_KINDS};
use crate::resource::{FilterSchema, MethodGuards, SqlResource, Verb};
use crate::services::customers;
use crate::types::ListEnvelope;

type Addresses = SqlResource<address::Entity, address::ActiveModel>;

const GUARDS: MethodGuards = MethodGuards::OPEN;

const FILTERS: FilterSchema = FilterSchema::EMPTY;

/// The kind field is a closed two-value set.
fn check_kind(kind: &str) -> AppResult<()> {
    if ADDRESS_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(AppError::field(
            "type",
            "Address type must be billing or delivery",
        ))
    }
}

/// Address creation payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddressRequest {
    pub country_id: i64,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(length(min = 1, message = "Zip code is required"))]
    pub zip_code: String,
    pub apartment: Option<String>,
    /// Anonymous callers may name the owning customer directly
    pub customer_id: Option<i64>,
}

/// Public address view.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: i64,
    pub customer_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub country_id: i64,
    pub city: String,
    pub street: String,
    pub apartment: Option<String>,
    pub zip_code: String,
}

impl From<address::Model> for AddressResponse {
    fn from(model: address::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            kind: model.kind,
            country_id: model.country_id,
            city: model.city,
            street: model.street,
            apartment: model.apartment,
            zip_code: model.zip_code,
        }
    }
}

/// Create address routes
pub fn address_routes() -> Router<AppState> {
    Router::new().route("/", get(list_addresses).post(create_address))
}

/// List the resolved customer's addresses
#[utoipa::path(
    get,
    path = "/addresses",
    tag = "Addresses",
    responses(
        (status = 200, description = "List envelope of addresses"),
        (status = 400, description = "No customer context"),
        (status = 404, description = "Customer id does not resolve")
    )
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<ListEnvelope<AddressResponse>>> {
    GUARDS.enforce(Verb::Get, &ctx)?;

    let args = FILTERS.clean(&query);
    let explicit = query.get("customer_id").and_then(|raw| raw.parse().ok());

    let owner = customers::resolve_customer(
        state.db(),
        ctx.user_model(),
        ctx.session_customer_id().await?,
        explicit,
    )
    .await?;

    let addresses = Addresses::new(state.db().clone());
    let scope = Condition::all().add(address::Column::CustomerId.eq(owner.id));
    let slice = addresses.page_scoped(scope, &args.filters, args.page).await?;

    Ok(Json(ListEnvelope::from_slice(slice, AddressResponse::from)))
}

/// Attach a new address to the resolved customer
#[utoipa::path(
    post,
    path = "/addresses",
    tag = "Addresses",
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address created", body = AddressResponse),
        (status = 400, description = "Validation failure or no customer context"),
        (status = 404, description = "Customer id does not resolve")
    )
)]
pub async fn create_address(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<AddressRequest>,
) -> AppResult<(StatusCode, Json<AddressResponse>)> {
    GUARDS.enforce(Verb::Post, &ctx)?;
    check_kind(&payload.kind)?;

    let owner = customers::resolve_customer(
        state.db(),
        ctx.user_model(),
        ctx.session_customer_id().await?,
        payload.customer_id,
    )
    .await?;

    let created = address::ActiveModel {
        customer_id: Set(owner.id),
        kind: Set(payload.kind),
        country_id: Set(payload.country_id),
        city: Set(payload.city),
        street: Set(payload.street),
        apartment: Set(payload.apartment),
        zip_code: Set(payload.zip_code),
        ..Default::default()
    }
    .insert(state.db())
    .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}
