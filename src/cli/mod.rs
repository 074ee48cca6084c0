//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `tasks` - Scheduled maintenance tasks, run once

pub mod args;

pub use args::{Cli, Commands};
