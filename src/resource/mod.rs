//! Generic resource framework.
//!
//! A resource is one entity type exposed over the standard HTTP verbs.
//! The pieces here are shared by every concrete resource:
//!
//! - [`ResourceBackend`]: the storage contract (fetch/create/paginate)
//!   implemented for both the relational and the document store, so
//!   concrete resources compose a backend instead of inheriting one.
//! - [`FilterSchema`]: static declaration of the query-string keys a
//!   resource accepts, with `page`/`page_size` always present.
//! - [`MethodGuards`]: ordered per-verb authorization chains applied
//!   before handler logic runs.

mod documents;
mod filters;
mod guards;
mod sql;

pub use documents::DocumentResource;
pub use filters::{CleanedArgs, FilterField, FilterKind, FilterSchema, FilterSet, FilterValue};
pub use guards::{Guard, Identity, MethodGuards, Verb};
pub use sql::SqlResource;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::types::{PageParams, PageSlice};

/// Storage contract shared by the relational and document backends.
#[async_trait]
pub trait ResourceBackend: Send + Sync {
    type Id: Send + 'static;
    type Model: Send;
    type Data: Send + 'static;

    /// Fetch a single object by primary key, or fail with not-found.
    async fn fetch_one(&self, id: Self::Id) -> AppResult<Self::Model>;

    /// Fetch every object matching the equality filter set.
    async fn fetch_many(&self, filters: &FilterSet) -> AppResult<Vec<Self::Model>>;

    /// Persist a new object from loosely-typed field data.
    async fn create(&self, data: Self::Data) -> AppResult<Self::Model>;

    /// Fetch one page of objects matching the filter set.
    async fn paginate(
        &self,
        filters: &FilterSet,
        params: PageParams,
    ) -> AppResult<PageSlice<Self::Model>>;
}
