//! Background jobs.

pub mod cart_expiry;

pub use cart_expiry::reclaim_abandoned_carts;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::CART_EXPIRY_SCHEDULE;
use crate::errors::{AppError, AppResult};

/// Start the cart-expiry scheduler.
///
/// Runs the reclamation sweep once a minute; the scheduler serializes
/// executions so runs never overlap.
pub async fn start_scheduler(db: DatabaseConnection) -> AppResult<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| AppError::internal(format!("scheduler init failed: {e}")))?;

    let job_db = db.clone();
    let job = Job::new_async(CART_EXPIRY_SCHEDULE, move |_uuid, _lock| {
        let db = job_db.clone();
        Box::pin(async move {
            if let Err(e) = cart_expiry::reclaim_abandoned_carts(&db).await {
                tracing::error!("Error reclaiming expired carts: {}", e);
            }
        })
    })
    .map_err(|e| AppError::internal(format!("scheduler job failed: {e}")))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| AppError::internal(format!("scheduler add failed: {e}")))?;
    scheduler
        .start()
        .await
        .map_err(|e| AppError::internal(format!("scheduler start failed: {e}")))?;

    tracing::info!("Cart expiry scheduler started");

    Ok(scheduler)
}
