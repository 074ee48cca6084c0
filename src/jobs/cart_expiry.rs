//! Abandoned-cart reclamation.
//!
//! Carts reserve shelf stock; a cart untouched for longer than the TTL
//! gives its reservation back. Restoring quantities and dropping the
//! expired carts happen in one transaction so inventory is never under-
//! or over-restored, and a reclaimed cart can never match again.

use chrono::{Duration, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};

use crate::config::CART_TTL_MINUTES;
use crate::errors::AppResult;
use crate::infra::entities::{cart, shelf};

/// Reclaim inventory from carts past the expiry cutoff.
///
/// Returns the number of carts dropped.
pub async fn reclaim_abandoned_carts(db: &DatabaseConnection) -> AppResult<u64> {
    let cutoff = Utc::now() - Duration::minutes(CART_TTL_MINUTES);

    let txn = db.begin().await?;

    let expired = cart::Entity::find()
        .filter(cart::Column::UpdatedAt.lt(cutoff))
        .all(&txn)
        .await?;

    for abandoned in &expired {
        shelf::Entity::update_many()
            .col_expr(
                shelf::Column::Quantity,
                Expr::col(shelf::Column::Quantity).add(abandoned.amount),
            )
            .filter(shelf::Column::PriceOptionId.eq(abandoned.price_option_id))
            .exec(&txn)
            .await?;
    }

    cart::Entity::delete_many()
        .filter(cart::Column::UpdatedAt.lt(cutoff))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    let reclaimed = expired.len() as u64;
    if reclaimed > 0 {
        tracing::info!(reclaimed, "expired carts reclaimed");
    }
    Ok(reclaimed)
}
