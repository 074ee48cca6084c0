//! Document-store connection handle.
//!
//! Optional at runtime: the handle is only constructed when a
//! `MONGODB_URL` is configured.

use mongodb::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppResult;
use crate::resource::DocumentResource;

/// Default database name when the connection URL does not carry one.
const DEFAULT_DOCUMENT_DB: &str = "commerce";

/// Connected document store.
#[derive(Clone)]
pub struct DocumentStore {
    database: mongodb::Database,
}

impl DocumentStore {
    pub async fn connect(url: &str) -> AppResult<Self> {
        let client = Client::with_uri_str(url).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DOCUMENT_DB));

        tracing::info!(database = %database.name(), "Document store connected");

        Ok(Self { database })
    }

    pub fn database(&self) -> &mongodb::Database {
        &self.database
    }

    /// Resource backend over one typed collection.
    pub fn resource<T>(&self, collection: &str) -> DocumentResource<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + Unpin,
    {
        DocumentResource::new(&self.database, collection)
    }
}
