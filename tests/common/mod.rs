//! Shared fixtures: in-memory SQLite database behind the real router,
//! driven through cookie-persisting test clients.
#![allow(dead_code)]

use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use serde_json::json;

use commerce_api::api::{create_router, AppState};
use commerce_api::config::ROLE_ADMIN;
use commerce_api::infra::entities::{cart, customer, role, shelf, user, user_role};
use commerce_api::infra::Migrator;

/// Fresh database with migrations applied, wrapped in the app router.
pub async fn setup_app() -> (Router, DatabaseConnection) {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("connect in-memory database");

    Migrator::up(&db, None).await.expect("run migrations");

    let state = AppState::new(db.clone(), None);
    (create_router(state), db)
}

/// Client with its own cookie jar over the shared app.
pub fn client(app: &Router) -> TestServer {
    let mut server = TestServer::new(app.clone()).expect("start test server");
    server.do_save_cookies();
    server
}

pub async fn register(server: &TestServer, email: &str, password: &str) {
    let response = server
        .post("/sessions")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

pub async fn login(server: &TestServer, email: &str, password: &str) {
    let response = server
        .put("/sessions/current")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
}

pub async fn register_and_login(server: &TestServer, email: &str, password: &str) {
    register(server, email, password).await;
    login(server, email, password).await;
}

pub async fn user_by_email(db: &DatabaseConnection, email: &str) -> user::Model {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .expect("query user")
        .expect("user exists")
}

pub async fn make_superuser(db: &DatabaseConnection, email: &str) {
    let mut account = user_by_email(db, email).await.into_active_model();
    account.is_superuser = Set(true);
    account.update(db).await.expect("promote user");
}

/// Ensure the admin role exists and attach it to the user.
pub async fn make_admin(db: &DatabaseConnection, email: &str) {
    let admin_role = match role::Entity::find()
        .filter(role::Column::Name.eq(ROLE_ADMIN))
        .one(db)
        .await
        .expect("query role")
    {
        Some(found) => found,
        None => role::ActiveModel {
            name: Set(ROLE_ADMIN.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("create admin role"),
    };

    let account = user_by_email(db, email).await;
    user_role::ActiveModel {
        user_id: Set(account.id),
        role_id: Set(admin_role.id),
    }
    .insert(db)
    .await
    .expect("grant admin role");
}

pub async fn seed_anonymous_customer(db: &DatabaseConnection) -> customer::Model {
    let now = Utc::now();
    customer::ActiveModel {
        user_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed anonymous customer")
}

pub async fn seed_shelf(db: &DatabaseConnection, price_option_id: i64, quantity: i32) -> shelf::Model {
    shelf::ActiveModel {
        price_option_id: Set(price_option_id),
        quantity: Set(quantity),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed shelf")
}

pub async fn seed_cart(
    db: &DatabaseConnection,
    customer_id: i64,
    price_option_id: i64,
    amount: i32,
    touched_at: chrono::DateTime<Utc>,
) -> cart::Model {
    cart::ActiveModel {
        customer_id: Set(customer_id),
        price_option_id: Set(price_option_id),
        amount: Set(amount),
        created_at: Set(touched_at),
        updated_at: Set(touched_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed cart")
}
