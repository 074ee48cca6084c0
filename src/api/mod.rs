//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers
//! - The per-request context extractor
//! - Custom extractors
//! - Route definitions

pub mod context;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use context::{AuthedUser, RequestContext};
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
