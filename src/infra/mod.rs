//! Infrastructure layer - External systems integration
//!
//! Database connections, entity definitions, migrations, and the
//! optional document-store handle.

pub mod db;
pub mod documents;
pub mod entities;

pub use db::{Database, Migrator};
pub use documents::DocumentStore;
