//! Bank account resource.
//!
//! Authentication is required on every verb; reads additionally check
//! ownership. "Not yours" is 401 here, distinct from the 403 used for
//! privileged-action denials.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
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
use crate::infra::entities::bank_account;
use crate::resource::{FilterField, FilterSchema, MethodGuards, SqlResource, Verb};
use crate::types::ListEnvelope;

type BankAccounts = SqlResource<bank_account::Entity, bank_account::ActiveModel>;

const GUARDS: MethodGuards = MethodGuards::AUTHENTICATED;

const FILTERS: FilterSchema = FilterSchema::new(&[FilterField::int("user_id")]);

/// Bank account payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BankAccountRequest {
    #[validate(length(min = 1, message = "Bank name is required"))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "IBAN is required"))]
    pub iban: String,
    #[validate(length(min = 1, message = "SWIFT is required"))]
    pub swift: String,
}

/// Owner-facing bank account view.
#[derive(Debug, Serialize, ToSchema)]
pub struct BankAccountResponse {
    pub id: i64,
    pub user_id: i64,
    pub bank_name: String,
    pub iban: String,
    pub swift: String,
}

impl From<bank_account::Model> for BankAccountResponse {
    fn from(model: bank_account::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            bank_name: model.bank_name,
            iban: model.iban,
            swift: model.swift,
        }
    }
}

/// Create bank account routes
pub fn bank_account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bank_accounts).post(create_bank_account))
        .route("/:id", get(get_bank_account))
}

/// List the caller's accounts (superusers may filter by user)
#[utoipa::path(
    get,
    path = "/bank_accounts",
    tag = "BankAccounts",
    responses(
        (status = 200, description = "List envelope of bank accounts"),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn list_bank_accounts(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Json<ListEnvelope<BankAccountResponse>>> {
    GUARDS.enforce(Verb::Get, &ctx)?;
    let caller = ctx.current_user()?;

    let mut args = FILTERS.clean(&query);

    // Non-superusers are always scoped to their own accounts, whatever
    // the query says.
    let scope = if caller.is_superuser() {
        Condition::all()
    } else {
        args.filters.retain(|(name, _)| *name != "user_id");
        Condition::all().add(bank_account::Column::UserId.eq(caller.id()))
    };

    let accounts = BankAccounts::new(state.db().clone());
    let slice = accounts.page_scoped(scope, &args.filters, args.page).await?;

    Ok(Json(ListEnvelope::from_slice(
        slice,
        BankAccountResponse::from,
    )))
}

/// Fetch one account; owner or superuser only
#[utoipa::path(
    get,
    path = "/bank_accounts/{id}",
    tag = "BankAccounts",
    params(("id" = i64, Path, description = "Bank account id")),
    responses(
        (status = 200, description = "Bank account", body = BankAccountResponse),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn get_bank_account(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<BankAccountResponse>> {
    GUARDS.enforce(Verb::Get, &ctx)?;
    let caller = ctx.current_user()?;

    let accounts = BankAccounts::new(state.db().clone());
    let account = accounts.fetch_one(id).await?;

    if account.check_owner(caller.id()) || caller.is_superuser() {
        Ok(Json(account.into()))
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Create an account owned by the caller
#[utoipa::path(
    post,
    path = "/bank_accounts",
    tag = "BankAccounts",
    request_body = BankAccountRequest,
    responses(
        (status = 201, description = "Bank account created", body = BankAccountResponse),
        (status = 400, description = "Validation failure")
    )
)]
pub async fn create_bank_account(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<BankAccountRequest>,
) -> AppResult<(StatusCode, Json<BankAccountResponse>)> {
    GUARDS.enforce(Verb::Post, &ctx)?;
    let caller = ctx.current_user()?;

    // The owner is always the caller, whatever the payload says.
    let created = bank_account::ActiveModel {
        user_id: Set(caller.id()),
        bank_name: Set(payload.bank_name),
        iban: Set(payload.iban),
        swift: Set(payload.swift),
        ..Default::default()
    }
    .insert(state.db())
    .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}
