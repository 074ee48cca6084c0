//! Document-store resource backend.
//!
//! Same verb contract as the relational backend over a typed MongoDB
//! collection: primary-key equality lookup with store-level fetch-or-404,
//! `insert_one` for creation, and the store's native skip/limit paging
//! constrained to the requested `(page, page_size)`. Filters use equality
//! semantics, matching the relational backend.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{FilterSet, FilterValue, ResourceBackend};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{PageParams, PageSlice, PageWindow};

impl From<&FilterValue> for Bson {
    fn from(value: &FilterValue) -> Self {
        match value {
            FilterValue::Int(v) => Bson::Int64(*v),
            FilterValue::Text(v) => Bson::String(v.clone()),
            FilterValue::Bool(v) => Bson::Boolean(*v),
        }
    }
}

/// Resource backend bound to one document collection.
pub struct DocumentResource<T>
where
    T: Send + Sync,
{
    collection: Collection<T>,
}

impl<T> DocumentResource<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.collection(collection),
        }
    }

    /// Equality filter document for the cleaned filter set.
    pub(crate) fn filter_doc(filters: &FilterSet) -> Document {
        let mut filter = Document::new();
        for (name, value) in filters {
            filter.insert(*name, Bson::from(value));
        }
        filter
    }

    pub async fn fetch_one(&self, id: ObjectId) -> AppResult<T> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_not_found()
    }

    pub async fn fetch_many(&self, filters: &FilterSet) -> AppResult<Vec<T>> {
        let cursor = self.collection.find(Self::filter_doc(filters)).await?;
        cursor.try_collect().await.map_err(Into::into)
    }

    /// Insert raw field data; structural rejection by the store maps to a
    /// validation failure, like schema errors on the relational side.
    pub async fn create(&self, data: Document) -> AppResult<T> {
        let result = self
            .collection
            .clone_with_type::<Document>()
            .insert_one(data)
            .await?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::internal("inserted document has no object id"))?;

        self.fetch_one(id).await
    }

    pub async fn paginate(
        &self,
        filters: &FilterSet,
        params: PageParams,
    ) -> AppResult<PageSlice<T>> {
        let filter = Self::filter_doc(filters);

        let count = self.collection.count_documents(filter.clone()).await?;
        let window = PageWindow::new(count, params);

        let items = self
            .collection
            .find(filter)
            .skip(window.offset)
            .limit(window.page_size as i64)
            .await?
            .try_collect()
            .await?;

        Ok(PageSlice::new(items, window))
    }
}

#[async_trait]
impl<T> ResourceBackend for DocumentResource<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    type Id = ObjectId;
    type Model = T;
    type Data = Document;

    async fn fetch_one(&self, id: ObjectId) -> AppResult<T> {
        DocumentResource::fetch_one(self, id).await
    }

    async fn fetch_many(&self, filters: &FilterSet) -> AppResult<Vec<T>> {
        DocumentResource::fetch_many(self, filters).await
    }

    async fn create(&self, data: Document) -> AppResult<T> {
        DocumentResource::create(self, data).await
    }

    async fn paginate(&self, filters: &FilterSet, params: PageParams) -> AppResult<PageSlice<T>> {
        DocumentResource::paginate(self, filters, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Doc {
        #[serde(rename = "_id")]
        id: ObjectId,
        label: String,
    }

    #[test]
    fn filter_document_uses_equality_semantics() {
        let filters: FilterSet = vec![
            ("customer_id", FilterValue::Int(12)),
            ("label", FilterValue::Text("primary".into())),
            ("active", FilterValue::Bool(true)),
        ];
        let filter = DocumentResource::<Doc>::filter_doc(&filters);

        assert_eq!(filter.get_i64("customer_id").unwrap(), 12);
        assert_eq!(filter.get_str("label").unwrap(), "primary");
        assert!(filter.get_bool("active").unwrap());
    }

    #[test]
    fn empty_filter_set_matches_everything() {
        let filter = DocumentResource::<Doc>::filter_doc(&FilterSet::new());
        assert!(filter.is_empty());
    }
}
