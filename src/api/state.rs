//! Application state - Dependency injection container.

use sea_orm::DatabaseConnection;

use crate::infra::DocumentStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Present only when a document-store URL is configured.
    documents: Option<DocumentStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, documents: Option<DocumentStore>) -> Self {
        Self { db, documents }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn documents(&self) -> Option<&DocumentStore> {
        self.documents.as_ref()
    }
}
