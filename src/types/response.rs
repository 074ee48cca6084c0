//! List-response envelope shared by every list endpoint.

use chrono::Utc;
use serde::Serialize;

use super::pagination::PageSlice;

/// Envelope metadata: totals plus the server clock at render time.
#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub total: u64,
    pub pages: u64,
    pub quantity: u64,
    pub current_time: String,
}

/// `{meta: {...}, objects: [...]}` wrapper for paginated collections.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T: Serialize> {
    pub meta: ListMeta,
    pub objects: Vec<T>,
}

impl<T: Serialize> ListEnvelope<T> {
    /// Wrap a page of models, serializing each through `serialize`.
    pub fn from_slice<M>(slice: PageSlice<M>, serialize: impl FnMut(M) -> T) -> Self {
        let PageSlice {
            items,
            total,
            pages,
            quantity,
        } = slice;

        Self {
            meta: ListMeta {
                total,
                pages,
                quantity,
                // ctime-style timestamp, e.g. "Thu Aug  6 12:00:00 2026"
                current_time: Utc::now().format("%a %b %e %H:%M:%S %Y").to_string(),
            },
            objects: items.into_iter().map(serialize).collect(),
        }
    }
}
