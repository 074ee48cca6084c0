//! Account service: registration, authentication, email confirmation.
//!
//! Authentication is the bridge between the anonymous and authenticated
//! session states: besides verifying credentials it adopts the carts of a
//! session's anonymous customer into the user's own customer record.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::config::{PASSWORD_PLACEHOLDER, SESSION_CUSTOMER_ID, SESSION_USER_ID};
use crate::domain::Password;
use crate::errors::{AppError, AppResult, FieldErrors, OptionExt};
use crate::infra::entities::{cart, customer, role, user, user_role};

type Db = sea_orm::DatabaseConnection;

/// Register a new account and its customer record.
///
/// A duplicate email is a field-level validation failure. Registration
/// never logs the session in; the confirmation token issued here feeds
/// the profile email-confirmation flow.
pub async fn register(db: &Db, email: &str, password: Option<&str>) -> AppResult<user::Model> {
    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(AppError::field("email", "This email is already taken"));
    }

    let hash = Password::new(password.unwrap_or(PASSWORD_PLACEHOLDER))?;
    let now = Utc::now();

    let created = user::ActiveModel {
        email: Set(email.to_string()),
        password: Set(hash.into_string()),
        active: Set(true),
        is_superuser: Set(false),
        confirmation_token: Set(Some(Uuid::new_v4().to_string())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    customer::ActiveModel {
        user_id: Set(Some(created.id)),
        email: Set(Some(created.email.clone())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(user_id = created.id, "account registered");
    Ok(created)
}

/// Authenticate the session against stored credentials.
///
/// Both an unknown email and a wrong password surface as the same
/// field-level lookup failure, leaving the session anonymous.
pub async fn authenticate(
    db: &Db,
    session: &Session,
    email: &str,
    password: &str,
) -> AppResult<user::Model> {
    let account = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;

    let verified = account
        .as_ref()
        .map(|found| Password::from_hash(found.password.clone()).verify(password))
        .unwrap_or(false);

    let Some(account) = account.filter(|_| verified) else {
        return Err(AppError::LookupFailed(FieldErrors::single(
            "email",
            "Can't find anyone with this credentials",
        )));
    };

    let mut active = account.into_active_model();
    active.logged_at = Set(Some(Utc::now()));
    let account = active.update(db).await?;

    let own_customer = customer_of(db, &account).await?;

    // Adopt the cart of the session's anonymous customer, if any.
    if let Some(anonymous_id) = session.get::<i64>(SESSION_CUSTOMER_ID).await? {
        if anonymous_id != own_customer.id {
            adopt_anonymous_customer(db, anonymous_id, own_customer.id).await?;
        }
    }

    session.insert(SESSION_USER_ID, account.id).await?;
    session.insert(SESSION_CUSTOMER_ID, own_customer.id).await?;

    tracing::info!(user_id = account.id, "session authenticated");
    Ok(account)
}

/// Move an anonymous customer's carts onto the target customer and drop
/// the anonymous record, atomically. Customers already linked to a user
/// are left untouched.
pub async fn adopt_anonymous_customer(db: &Db, anonymous_id: i64, target_id: i64) -> AppResult<()> {
    let txn = db.begin().await?;

    let anonymous = customer::Entity::find_by_id(anonymous_id).one(&txn).await?;
    if let Some(anonymous) = anonymous.filter(customer::Model::is_anonymous) {
        cart::Entity::update_many()
            .col_expr(cart::Column::CustomerId, Expr::value(target_id))
            .filter(cart::Column::CustomerId.eq(anonymous.id))
            .exec(&txn)
            .await?;

        customer::Entity::delete_by_id(anonymous.id).exec(&txn).await?;

        tracing::info!(
            anonymous_id = anonymous.id,
            target_id,
            "anonymous customer merged"
        );
    }

    txn.commit().await?;
    Ok(())
}

/// Drop identity keys from the session.
pub async fn logout(session: &Session) -> AppResult<()> {
    let _: Option<i64> = session.remove(SESSION_USER_ID).await?;
    let _: Option<i64> = session.remove(SESSION_CUSTOMER_ID).await?;
    tracing::info!("identity changed: anonymous");
    Ok(())
}

/// Complete email confirmation for the given token and log the confirmed
/// user in as a side effect.
pub async fn confirm_email(db: &Db, session: &Session, token: &str) -> AppResult<user::Model> {
    let account = user::Entity::find()
        .filter(user::Column::ConfirmationToken.eq(token))
        .one(db)
        .await?
        .ok_or_not_found()?;

    let mut active = account.into_active_model();
    active.confirmation_token = Set(None);
    active.confirmed_at = Set(Some(Utc::now()));
    let account = active.update(db).await?;

    session.insert(SESSION_USER_ID, account.id).await?;
    session.insert(SESSION_CUSTOMER_ID, customer_of(db, &account).await?.id).await?;

    tracing::info!(user_id = account.id, "email confirmed");
    Ok(account)
}

/// The user's own customer record, created on first touch.
pub async fn customer_of(db: &Db, account: &user::Model) -> AppResult<customer::Model> {
    let existing = customer::Entity::find()
        .filter(customer::Column::UserId.eq(account.id))
        .one(db)
        .await?;

    match existing {
        Some(found) => Ok(found),
        None => {
            let now = Utc::now();
            let created = customer::ActiveModel {
                user_id: Set(Some(account.id)),
                email: Set(Some(account.email.clone())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(created)
        }
    }
}

/// Whether the user already holds the given role.
pub async fn user_has_role(db: &Db, user_id: i64, role_id: i64) -> AppResult<bool> {
    Ok(user_role::Entity::find_by_id((user_id, role_id))
        .one(db)
        .await?
        .is_some())
}

/// Attach a role to a user.
pub async fn grant_role(db: &Db, user_id: i64, role: &role::Model) -> AppResult<()> {
    user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role.id),
    }
    .insert(db)
    .await?;
    Ok(())
}
