//! Generic resource-backend contract tests over the relational store.
//!
//! The concrete resources compose `SqlResource` directly; these tests
//! exercise the same operations through the `ResourceBackend` trait to
//! keep both backends honest about the shared contract.

mod common;

use commerce_api::infra::entities::role;
use commerce_api::resource::{FilterSet, FilterValue, ResourceBackend, SqlResource};
use commerce_api::types::PageParams;
use commerce_api::AppError;

use common::setup_app;

type Roles = SqlResource<role::Entity, role::ActiveModel>;

async fn seed_roles<B>(backend: &B, count: usize)
where
    B: ResourceBackend<Data = serde_json::Value>,
{
    for index in 0..count {
        backend
            .create(serde_json::json!({ "name": format!("group-{index}") }))
            .await
            .expect("create role");
    }
}

#[tokio::test]
async fn create_builds_rows_from_loose_field_data() {
    let (_app, db) = setup_app().await;
    let backend = Roles::new(db);

    let created = ResourceBackend::create(&backend, serde_json::json!({ "name": "support" }))
        .await
        .expect("create role");

    assert!(created.id > 0);
    assert_eq!(created.name, "support");

    let fetched = ResourceBackend::fetch_one(&backend, created.id)
        .await
        .expect("fetch role");
    assert_eq!(fetched.name, "support");
}

#[tokio::test]
async fn fetch_one_misses_report_not_found() {
    let (_app, db) = setup_app().await;
    let backend = Roles::new(db);

    let missing = ResourceBackend::fetch_one(&backend, 4242).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
}

#[tokio::test]
async fn fetch_many_applies_equality_filters() {
    let (_app, db) = setup_app().await;
    let backend = Roles::new(db);
    seed_roles(&backend, 3).await;

    let filters: FilterSet = vec![("name", FilterValue::Text("group-1".into()))];
    let matched = ResourceBackend::fetch_many(&backend, &filters)
        .await
        .expect("filtered fetch");

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "group-1");
}

#[tokio::test]
async fn pagination_clamps_out_of_range_pages() {
    let (_app, db) = setup_app().await;
    let backend = Roles::new(db);
    seed_roles(&backend, 7).await;

    let slice = ResourceBackend::paginate(
        &backend,
        &FilterSet::new(),
        PageParams {
            page: 99,
            page_size: 3,
        },
    )
    .await
    .expect("paginate");

    // Page 99 clamps to the last page, which holds the remainder.
    assert_eq!(slice.total, 7);
    assert_eq!(slice.pages, 3);
    assert_eq!(slice.quantity, 3);
    assert_eq!(slice.items.len(), 1);
}

#[tokio::test]
async fn pagination_of_an_empty_set_is_well_formed() {
    let (_app, db) = setup_app().await;
    let backend = Roles::new(db);

    let slice = ResourceBackend::paginate(&backend, &FilterSet::new(), PageParams::default())
        .await
        .expect("paginate");

    assert_eq!(slice.total, 0);
    assert_eq!(slice.pages, 0);
    assert!(slice.items.is_empty());
}

#[tokio::test]
async fn updates_touch_only_provided_fields() {
    let (_app, db) = setup_app().await;
    let backend = Roles::new(db);

    let created = backend
        .create(serde_json::json!({ "name": "before" }))
        .await
        .expect("create role");

    let updated = backend
        .update(created.id, serde_json::json!({ "name": "after" }))
        .await
        .expect("update role");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "after");
}
