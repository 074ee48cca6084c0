//! Relational resource backend over SeaORM entities.
//!
//! Works for any entity with an `i64` primary key: equality filters become
//! a `Condition`, creation and update go through the entity's `ActiveModel`
//! JSON mapping, and pagination applies `limit`/`offset` to the filtered
//! query. Scoped variants accept an extra `Condition` so concrete
//! resources can narrow the query set before the shared logic runs.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, IdenStatic, IntoActiveModel, Iterable, PaginatorTrait, PrimaryKeyTrait,
    QueryFilter, QuerySelect,
};
use serde::Serialize;

use super::{FilterSet, FilterValue, ResourceBackend};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{PageParams, PageSlice, PageWindow};

impl From<FilterValue> for sea_orm::Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Int(v) => v.into(),
            FilterValue::Text(v) => v.into(),
            FilterValue::Bool(v) => v.into(),
        }
    }
}

/// Resource backend bound to one SeaORM entity.
pub struct SqlResource<E, A> {
    db: DatabaseConnection,
    _entity: PhantomData<fn() -> (E, A)>,
}

impl<E, A> SqlResource<E, A>
where
    E: EntityTrait,
    E::Model: Serialize + Send + Sync + IntoActiveModel<A>,
    for<'de> E::Model: serde::Deserialize<'de>,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Resolve a declared filter name to an entity column.
    fn column(name: &str) -> Option<E::Column> {
        E::Column::iter().find(|column| column.as_str() == name)
    }

    /// Equality condition for the cleaned filter set.
    pub(crate) fn condition(filters: &FilterSet) -> Condition {
        let mut condition = Condition::all();
        for (name, value) in filters {
            match Self::column(name) {
                Some(column) => condition = condition.add(column.eq(value.clone())),
                None => tracing::debug!(field = name, "filter does not match a column"),
            }
        }
        condition
    }

    pub async fn fetch_one(&self, id: i64) -> AppResult<E::Model> {
        E::find_by_id(id).one(&self.db).await?.ok_or_not_found()
    }

    /// Fetch by id within an additional scope, 404 when the scope excludes it.
    pub async fn fetch_one_scoped(&self, id: i64, scope: Condition) -> AppResult<E::Model> {
        E::find_by_id(id)
            .filter(scope)
            .one(&self.db)
            .await?
            .ok_or_not_found()
    }

    pub async fn fetch_many(&self, filters: &FilterSet) -> AppResult<Vec<E::Model>> {
        E::find()
            .filter(Self::condition(filters))
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn create(&self, data: serde_json::Value) -> AppResult<E::Model> {
        let model = A::from_json(data)?.insert(&self.db).await?;
        Ok(model)
    }

    /// Fetch-or-404, then apply the provided fields.
    pub async fn update(&self, id: i64, data: serde_json::Value) -> AppResult<E::Model> {
        let mut active = self.fetch_one(id).await?.into_active_model();
        active.set_from_json(data)?;
        let model = active.update(&self.db).await?;
        Ok(model)
    }

    /// Fetch-or-404 semantics for deletion: absent rows report not-found.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn paginate(
        &self,
        filters: &FilterSet,
        params: PageParams,
    ) -> AppResult<PageSlice<E::Model>> {
        self.page_scoped(Condition::all(), filters, params).await
    }

    /// Paginate within an additional scope condition.
    pub async fn page_scoped(
        &self,
        scope: Condition,
        filters: &FilterSet,
        params: PageParams,
    ) -> AppResult<PageSlice<E::Model>> {
        let query = E::find().filter(scope).filter(Self::condition(filters));

        let count = query.clone().count(&self.db).await?;
        let window = PageWindow::new(count, params);

        let items = query
            .limit(window.page_size)
            .offset(window.offset)
            .all(&self.db)
            .await?;

        Ok(PageSlice::new(items, window))
    }
}

#[async_trait]
impl<E, A> ResourceBackend for SqlResource<E, A>
where
    E: EntityTrait,
    E::Model: Serialize + Send + Sync + IntoActiveModel<A>,
    for<'de> E::Model: serde::Deserialize<'de>,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    type Id = i64;
    type Model = E::Model;
    type Data = serde_json::Value;

    async fn fetch_one(&self, id: i64) -> AppResult<E::Model> {
        SqlResource::fetch_one(self, id).await
    }

    async fn fetch_many(&self, filters: &FilterSet) -> AppResult<Vec<E::Model>> {
        SqlResource::fetch_many(self, filters).await
    }

    async fn create(&self, data: serde_json::Value) -> AppResult<E::Model> {
        SqlResource::create(self, data).await
    }

    async fn paginate(
        &self,
        filters: &FilterSet,
        params: PageParams,
    ) -> AppResult<PageSlice<E::Model>> {
        SqlResource::paginate(self, filters, params).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;
    use crate::infra::entities::bank_account;

    type Accounts = SqlResource<bank_account::Entity, bank_account::ActiveModel>;

    #[test]
    fn filters_resolve_to_declared_columns_only() {
        let filters: FilterSet = vec![
            ("user_id", FilterValue::Int(7)),
            ("no_such_column", FilterValue::Text("x".into())),
        ];

        let sql = bank_account::Entity::find()
            .filter(Accounts::condition(&filters))
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains("user_id"));
        assert!(!sql.contains("no_such_column"));
    }

    #[test]
    fn empty_filters_add_no_predicates() {
        let unfiltered = bank_account::Entity::find()
            .build(DbBackend::Sqlite)
            .to_string();
        let filtered = bank_account::Entity::find()
            .filter(Accounts::condition(&FilterSet::new()))
            .build(DbBackend::Sqlite)
            .to_string();
        assert_eq!(unfiltered, filtered);
    }
}
