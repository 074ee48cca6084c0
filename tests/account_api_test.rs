//! Integration tests for the account HTTP surface.
//!
//! Every test runs the real router over a fresh in-memory database;
//! clients keep their cookies so session state behaves as in production.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::*;

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn session_snapshot_starts_anonymous() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server.get("/sessions").await;
    response.assert_status(StatusCode::OK);

    let snapshot: Value = response.json();
    assert_eq!(snapshot["is_anonymous"], json!(true));
    assert_eq!(snapshot["uid"], Value::Null);
}

#[tokio::test]
async fn registering_the_same_email_twice_is_a_field_error() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    register(&server, "dup@example.com", "secret123").await;

    let response = server
        .post("/sessions")
        .json(&json!({ "email": "dup@example.com", "password": "other456" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["email"], json!("This email is already taken"));
}

#[tokio::test]
async fn register_rejects_malformed_email_with_400() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server
        .post("/sessions")
        .json(&json!({ "email": "not-an-email" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body.get("email").is_some());
}

#[tokio::test]
async fn authentication_transitions_the_session() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    register(&server, "alice@example.com", "secret123").await;

    let response = server
        .put("/sessions/current")
        .json(&json!({ "email": "alice@example.com", "password": "secret123" }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    let snapshot: Value = server.get("/sessions").await.json();
    assert_eq!(snapshot["is_anonymous"], json!(false));
    assert!(snapshot["uid"].is_string());
}

#[tokio::test]
async fn wrong_credentials_leave_the_session_anonymous() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    register(&server, "bob@example.com", "secret123").await;

    let response = server
        .put("/sessions/current")
        .json(&json!({ "email": "bob@example.com", "password": "wrong" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["email"], json!("Can't find anyone with this credentials"));

    let snapshot: Value = server.get("/sessions").await.json();
    assert_eq!(snapshot["is_anonymous"], json!(true));
}

#[tokio::test]
async fn authenticate_reports_validation_failures_as_404() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    // The register verb answers 400 for the same class of error.
    let response = server
        .put("/sessions/current")
        .json(&json!({ "email": "not-an-email" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_returns_to_anonymous() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "carol@example.com", "secret123").await;

    let response = server.delete("/sessions/current").await;
    response.assert_status(StatusCode::NO_CONTENT);

    let snapshot: Value = server.get("/sessions").await.json();
    assert_eq!(snapshot["is_anonymous"], json!(true));
    assert_eq!(snapshot["uid"], Value::Null);
}

// =============================================================================
// Profiles
// =============================================================================

#[tokio::test]
async fn anonymous_profile_listing_never_exposes_emails() {
    let (app, _db) = setup_app().await;
    let owner = client(&app);
    register(&owner, "private@example.com", "secret123").await;

    let anonymous = client(&app);
    let body: Value = anonymous.get("/profiles").await.json();

    let objects = body["objects"].as_array().expect("objects array");
    assert!(!objects.is_empty());
    for profile in objects {
        assert!(profile.get("email").is_none());
        assert!(profile.get("password").is_none());
    }
}

#[tokio::test]
async fn profile_owner_sees_their_own_email() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "dora@example.com", "secret123").await;
    let account = user_by_email(&db, "dora@example.com").await;

    let profile: Value = server.get(&format!("/profiles/{}", account.id)).await.json();
    assert_eq!(profile["email"], json!("dora@example.com"));
}

#[tokio::test]
async fn non_superuser_fetching_another_profile_sees_only_self() {
    let (app, db) = setup_app().await;

    let first = client(&app);
    register(&first, "first@example.com", "secret123").await;
    let first_account = user_by_email(&db, "first@example.com").await;

    let second = client(&app);
    register_and_login(&second, "second@example.com", "secret123").await;
    let second_account = user_by_email(&db, "second@example.com").await;

    // Asking for someone else's id still answers with the caller's profile.
    let profile: Value = second
        .get(&format!("/profiles/{}", first_account.id))
        .await
        .json();
    assert_eq!(profile["id"], json!(second_account.id));
    assert_eq!(profile["email"], json!("second@example.com"));
}

#[tokio::test]
async fn anonymous_single_profile_get_is_not_found() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server.get("/profiles/1").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_post_is_statically_disabled() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server
        .post("/profiles")
        .json(&json!({ "email": "x@example.com" }))
        .await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn profile_update_validates_the_password_sub_schema() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "eva@example.com", "secret123").await;
    let account = user_by_email(&db, "eva@example.com").await;
    let path = format!("/profiles/{}", account.id);

    // Too short
    let response = server
        .put(&path)
        .json(&json!({
            "first_name": "Eva", "last_name": "Nine", "phone": "555",
            "password": "abc", "confirmation": "abc"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body.get("password").is_some());

    // Mismatched confirmation
    let response = server
        .put(&path)
        .json(&json!({
            "first_name": "Eva", "last_name": "Nine", "phone": "555",
            "password": "longenough", "confirmation": "different"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body.get("confirmation").is_some());

    // Valid change
    let response = server
        .put(&path)
        .json(&json!({
            "first_name": "Eva", "last_name": "Nine", "phone": "555",
            "password": "newsecret", "confirmation": "newsecret"
        }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    // The new password authenticates on a fresh client.
    let fresh = client(&app);
    login(&fresh, "eva@example.com", "newsecret").await;
}

#[tokio::test]
async fn role_change_by_non_superuser_is_forbidden() {
    let (app, db) = setup_app().await;

    let admin = client(&app);
    register_and_login(&admin, "root@example.com", "secret123").await;
    make_admin(&db, "root@example.com").await;
    make_superuser(&db, "root@example.com").await;

    // Create a spare role to request.
    let created: Value = admin
        .post("/roles")
        .json(&json!({ "name": "editor" }))
        .await
        .json();
    let role_id = created["id"].as_i64().expect("role id");

    let server = client(&app);
    register_and_login(&server, "plain@example.com", "secret123").await;
    let account = user_by_email(&db, "plain@example.com").await;

    let response = server
        .put(&format!("/profiles/{}", account.id))
        .json(&json!({
            "first_name": "Plain", "last_name": "User", "phone": "555",
            "role_id": role_id
        }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn email_confirmation_token_logs_the_viewer_in() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    register(&server, "confirm@example.com", "secret123").await;
    let account = user_by_email(&db, "confirm@example.com").await;
    let token = account.confirmation_token.clone().expect("token issued");

    let response = server
        .get(&format!("/profiles/{}", account.id))
        .json(&json!({ "token": token }))
        .await;
    response.assert_status(StatusCode::OK);

    let profile: Value = response.json();
    assert_eq!(profile["email"], json!("confirm@example.com"));

    // Reading with a valid token authenticated the session.
    let snapshot: Value = server.get("/sessions").await.json();
    assert_eq!(snapshot["is_anonymous"], json!(false));
}

// =============================================================================
// Roles
// =============================================================================

#[tokio::test]
async fn role_listing_requires_authentication() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server.get("/roles").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_creation_requires_the_admin_role() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "member@example.com", "secret123").await;

    let response = server
        .post("/roles")
        .json(&json!({ "name": "manager" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_delete_is_rejected_even_for_superusers() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "boss@example.com", "secret123").await;
    make_admin(&db, "boss@example.com").await;
    make_superuser(&db, "boss@example.com").await;

    let created: Value = server
        .post("/roles")
        .json(&json!({ "name": "temporary" }))
        .await
        .json();
    let role_id = created["id"].as_i64().expect("role id");

    let response = server.delete(&format!("/roles/{role_id}")).await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn role_listing_paginates_with_the_envelope() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "pager@example.com", "secret123").await;
    make_admin(&db, "pager@example.com").await;

    // The admin role already exists; add 24 more for 25 total.
    for index in 0..24 {
        let response = server
            .post("/roles")
            .json(&json!({ "name": format!("role-{index}") }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let body: Value = server.get("/roles?page=2&page_size=10").await.json();

    assert_eq!(body["meta"]["total"], json!(25));
    assert_eq!(body["meta"]["pages"], json!(3));
    assert_eq!(body["meta"]["quantity"], json!(10));
    assert!(body["meta"]["current_time"].is_string());
    assert_eq!(body["objects"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn invalid_page_parameters_fall_back_to_defaults() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "fallback@example.com", "secret123").await;
    make_admin(&db, "fallback@example.com").await;

    let response = server.get("/roles?page=zero&page_size=-3").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["meta"]["quantity"], json!(20));
}

// =============================================================================
// Bank accounts
// =============================================================================

#[tokio::test]
async fn bank_accounts_require_authentication() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server.get("/bank_accounts").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bank_account_reads_enforce_ownership() {
    let (app, db) = setup_app().await;

    let owner = client(&app);
    register_and_login(&owner, "owner@example.com", "secret123").await;

    let created: Value = owner
        .post("/bank_accounts")
        .json(&json!({ "bank_name": "First Bank", "iban": "DE0012345", "swift": "FRSTDE" }))
        .await
        .json();
    let account_id = created["id"].as_i64().expect("account id");

    // Owner reads fine.
    let response = owner.get(&format!("/bank_accounts/{account_id}")).await;
    response.assert_status(StatusCode::OK);

    // A different authenticated user gets 401.
    let intruder = client(&app);
    register_and_login(&intruder, "intruder@example.com", "secret123").await;
    let response = intruder.get(&format!("/bank_accounts/{account_id}")).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // A superuser may read anyone's account.
    let root = client(&app);
    register_and_login(&root, "sudo@example.com", "secret123").await;
    make_superuser(&db, "sudo@example.com").await;
    let response = root.get(&format!("/bank_accounts/{account_id}")).await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn bank_account_listing_is_scoped_to_the_caller() {
    let (app, _db) = setup_app().await;

    let first = client(&app);
    register_and_login(&first, "one@example.com", "secret123").await;
    first
        .post("/bank_accounts")
        .json(&json!({ "bank_name": "A", "iban": "IBAN-A", "swift": "SWIFT-A" }))
        .await
        .assert_status(StatusCode::CREATED);

    let second = client(&app);
    register_and_login(&second, "two@example.com", "secret123").await;

    let body: Value = second.get("/bank_accounts").await.json();
    assert_eq!(body["meta"]["total"], json!(0));

    // Even an explicit user_id filter cannot widen the scope.
    let body: Value = second.get("/bank_accounts?user_id=1").await.json();
    assert_eq!(body["meta"]["total"], json!(0));
}

// =============================================================================
// Customers & addresses
// =============================================================================

#[tokio::test]
async fn anonymous_customer_post_without_context_is_400() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server
        .post("/customers")
        .json(&json!({
            "first_name": "Ghost", "last_name": "Shopper", "email": "ghost@example.com"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body.get("customer_id").is_some());
}

#[tokio::test]
async fn customer_post_updates_the_callers_customer() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    register_and_login(&server, "shopper@example.com", "secret123").await;

    let response = server
        .post("/customers")
        .json(&json!({
            "first_name": "Sally", "last_name": "Shopper",
            "email": "shopper@example.com", "company": "ACME"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["first_name"], json!("Sally"));
    assert_eq!(body["company"], json!("ACME"));

    let account = user_by_email(&db, "shopper@example.com").await;
    assert_eq!(body["user_id"], json!(account.id));
}

#[tokio::test]
async fn customer_put_cannot_reach_other_customers() {
    let (app, _db) = setup_app().await;

    let first = client(&app);
    register_and_login(&first, "mine@example.com", "secret123").await;
    let own: Value = first
        .post("/customers")
        .json(&json!({
            "first_name": "Mine", "last_name": "Own", "email": "mine@example.com"
        }))
        .await
        .json();
    let own_id = own["id"].as_i64().expect("customer id");

    let second = client(&app);
    register_and_login(&second, "other@example.com", "secret123").await;

    let response = second
        .put(&format!("/customers/{own_id}"))
        .json(&json!({
            "first_name": "Stolen", "last_name": "Record", "email": "other@example.com"
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn address_post_without_customer_context_is_400() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server
        .post("/addresses")
        .json(&json!({
            "country_id": 1, "city": "Berlin", "street": "Unter den Linden 1",
            "type": "billing", "zip_code": "10117"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn address_post_accepts_an_explicit_customer_for_anonymous_callers() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    let guest = seed_anonymous_customer(&db).await;

    let response = server
        .post("/addresses")
        .json(&json!({
            "country_id": 1, "city": "Berlin", "street": "Unter den Linden 1",
            "type": "delivery", "zip_code": "10117", "customer_id": guest.id
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["customer_id"], json!(guest.id));
    assert_eq!(body["type"], json!("delivery"));
}

#[tokio::test]
async fn address_type_outside_the_closed_set_is_rejected() {
    let (app, db) = setup_app().await;
    let server = client(&app);

    let guest = seed_anonymous_customer(&db).await;

    let response = server
        .post("/addresses")
        .json(&json!({
            "country_id": 1, "city": "Berlin", "street": "Somewhere 2",
            "type": "shipping", "zip_code": "10117", "customer_id": guest.id
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dangling_customer_reference_is_404() {
    let (app, _db) = setup_app().await;
    let server = client(&app);

    let response = server
        .post("/addresses")
        .json(&json!({
            "country_id": 1, "city": "Berlin", "street": "Nowhere 3",
            "type": "billing", "zip_code": "10117", "customer_id": 424242
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
