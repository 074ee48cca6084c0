//! Cart-expiry reclamation and anonymous-cart merge tests.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tower_sessions::{MemoryStore, Session};

use commerce_api::config::{SESSION_CUSTOMER_ID, SESSION_USER_ID};
use commerce_api::infra::entities::{cart, customer, shelf};
use commerce_api::jobs::reclaim_abandoned_carts;
use commerce_api::services::account;

use common::*;

fn detached_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

#[tokio::test]
async fn expired_carts_restore_shelf_quantity_once() {
    let (_app, db) = setup_app().await;

    let guest = seed_anonymous_customer(&db).await;
    let stock = seed_shelf(&db, 77, 3).await;

    let stale = Utc::now() - Duration::minutes(30);
    seed_cart(&db, guest.id, 77, 2, stale).await;

    let reclaimed = reclaim_abandoned_carts(&db).await.expect("first sweep");
    assert_eq!(reclaimed, 1);

    let restocked = shelf::Entity::find_by_id(stock.id)
        .one(&db)
        .await
        .expect("query shelf")
        .expect("shelf exists");
    assert_eq!(restocked.quantity, 5);

    let remaining = cart::Entity::find().all(&db).await.expect("query carts");
    assert!(remaining.is_empty());

    // A second immediate run has nothing left to reclaim.
    let reclaimed = reclaim_abandoned_carts(&db).await.expect("second sweep");
    assert_eq!(reclaimed, 0);

    let untouched = shelf::Entity::find_by_id(stock.id)
        .one(&db)
        .await
        .expect("query shelf")
        .expect("shelf exists");
    assert_eq!(untouched.quantity, 5);
}

#[tokio::test]
async fn fresh_carts_survive_the_sweep() {
    let (_app, db) = setup_app().await;

    let guest = seed_anonymous_customer(&db).await;
    seed_shelf(&db, 5, 10).await;
    seed_cart(&db, guest.id, 5, 4, Utc::now()).await;

    let reclaimed = reclaim_abandoned_carts(&db).await.expect("sweep");
    assert_eq!(reclaimed, 0);

    let remaining = cart::Entity::find().all(&db).await.expect("query carts");
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn login_adopts_the_anonymous_customers_cart() {
    let (_app, db) = setup_app().await;

    account::register(&db, "merge@example.com", Some("secret123"))
        .await
        .expect("register");

    let guest = seed_anonymous_customer(&db).await;
    seed_shelf(&db, 9, 10).await;
    let reserved = seed_cart(&db, guest.id, 9, 3, Utc::now()).await;

    // The session carries the guest customer, as after anonymous browsing.
    let session = detached_session();
    session
        .insert(SESSION_CUSTOMER_ID, guest.id)
        .await
        .expect("seed session");

    let account = account::authenticate(&db, &session, "merge@example.com", "secret123")
        .await
        .expect("authenticate");

    // The cart now belongs to the user's own customer.
    let own_customer = customer::Entity::find()
        .filter(customer::Column::UserId.eq(account.id))
        .one(&db)
        .await
        .expect("query customer")
        .expect("customer exists");

    let moved = cart::Entity::find_by_id(reserved.id)
        .one(&db)
        .await
        .expect("query cart")
        .expect("cart survived the merge");
    assert_eq!(moved.customer_id, own_customer.id);

    // The anonymous customer record no longer resolves.
    let gone = customer::Entity::find_by_id(guest.id)
        .one(&db)
        .await
        .expect("query customer");
    assert!(gone.is_none());

    // The session now carries the user's identity and customer.
    let session_user: Option<i64> = session.get(SESSION_USER_ID).await.expect("session read");
    assert_eq!(session_user, Some(account.id));
    let session_customer: Option<i64> = session
        .get(SESSION_CUSTOMER_ID)
        .await
        .expect("session read");
    assert_eq!(session_customer, Some(own_customer.id));
}

#[tokio::test]
async fn login_leaves_linked_customers_alone() {
    let (_app, db) = setup_app().await;

    account::register(&db, "keeper@example.com", Some("secret123"))
        .await
        .expect("register first");
    account::register(&db, "linked@example.com", Some("secret123"))
        .await
        .expect("register second");

    // Point the session at the second user's customer: it is linked to a
    // user, so authentication must not merge or delete it.
    let linked = user_by_email(&db, "linked@example.com").await;
    let linked_customer = customer::Entity::find()
        .filter(customer::Column::UserId.eq(linked.id))
        .one(&db)
        .await
        .expect("query customer")
        .expect("customer exists");

    let session = detached_session();
    session
        .insert(SESSION_CUSTOMER_ID, linked_customer.id)
        .await
        .expect("seed session");

    account::authenticate(&db, &session, "keeper@example.com", "secret123")
        .await
        .expect("authenticate");

    let survivor = customer::Entity::find_by_id(linked_customer.id)
        .one(&db)
        .await
        .expect("query customer");
    assert!(survivor.is_some());
}
