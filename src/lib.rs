//! Commerce account API
//!
//! Account and commerce-resource layer of an e-commerce backend:
//! authentication sessions, user profiles, addresses, bank accounts,
//! customers, and roles, built on a generic resource framework that
//! spans a relational and a document persistence backend.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: Command-line interface and implementations
//! - **config**: Application configuration and constants
//! - **domain**: Value objects and session identity
//! - **resource**: Generic resource framework (backends, filters, guards)
//! - **services**: Use cases spanning multiple entities
//! - **infra**: Database, entities, migrations, document store
//! - **api**: HTTP handlers, extractors, and routes
//! - **jobs**: Scheduled maintenance (cart expiry)
//! - **types**: Shared types (pagination, list envelope)
//! - **errors**: Centralized error handling

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod resource;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{AppState, RequestContext};
pub use config::Config;
pub use errors::{AppError, AppResult, FieldErrors};
