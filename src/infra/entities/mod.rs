//! SeaORM entity definitions
//!
//! Database-specific entities; public serialization goes through the
//! per-resource views at the API boundary, never through these models.

pub mod address;
pub mod bank_account;
pub mod cart;
pub mod customer;
pub mod role;
pub mod shelf;
pub mod user;
pub mod user_role;
