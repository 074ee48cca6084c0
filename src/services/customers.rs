//! Customer resolution shared by the address and customer resources.
//!
//! The owning customer comes from the authenticated user when there is
//! one; anonymous callers must carry a customer id in the session or in
//! the request itself.

use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::entities::{customer, user};
use crate::services::account;

use sea_orm::EntityTrait;

type Db = sea_orm::DatabaseConnection;

/// Resolve the customer a commerce request acts on.
///
/// Missing context is a field-level 400; a dangling id is a 404.
pub async fn resolve_customer(
    db: &Db,
    current_user: Option<&user::Model>,
    session_customer_id: Option<i64>,
    explicit_customer_id: Option<i64>,
) -> AppResult<customer::Model> {
    if let Some(account) = current_user {
        return account::customer_of(db, account).await;
    }

    let customer_id = session_customer_id
        .or(explicit_customer_id)
        .ok_or_else(|| AppError::field("customer_id", "Customer could not be determined"))?;

    customer::Entity::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or_not_found()
}
