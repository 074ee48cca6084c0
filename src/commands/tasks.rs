//! Tasks command - Run maintenance tasks once.
//!
//! The same sweeps the in-server scheduler runs on a cadence, exposed
//! for cron-style external scheduling.

use crate::cli::args::{TasksAction, TasksArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::jobs;

/// Execute the tasks command
pub async fn execute(args: TasksArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;

    match args.action {
        TasksAction::CartExpiry => {
            let reclaimed = jobs::reclaim_abandoned_carts(db.connection()).await?;
            tracing::info!(reclaimed, "cart expiry sweep finished");
        }
    }

    Ok(())
}
