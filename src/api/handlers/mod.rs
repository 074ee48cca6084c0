//! HTTP request handlers, one module per resource.

pub mod address_handler;
pub mod bank_account_handler;
pub mod customer_handler;
pub mod profile_handler;
pub mod role_handler;
pub mod session_handler;

pub use address_handler::address_routes;
pub use bank_account_handler::bank_account_routes;
pub use customer_handler::customer_routes;
pub use profile_handler::profile_routes;
pub use role_handler::role_routes;
pub use session_handler::session_routes;
