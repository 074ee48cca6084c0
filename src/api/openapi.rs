//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{
    address_handler, bank_account_handler, customer_handler, profile_handler, role_handler,
    session_handler,
};
use crate::domain::SessionSnapshot;

/// OpenAPI documentation for the commerce account API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Commerce Account API",
        version = "0.1.0",
        description = "Account and commerce-resource layer: sessions, profiles, addresses, bank accounts, customers, and roles",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // Sessions
        session_handler::current,
        session_handler::current_by_id,
        session_handler::register,
        session_handler::authenticate,
        session_handler::logout,
        // Profiles
        profile_handler::list_profiles,
        profile_handler::get_profile,
        profile_handler::create_disabled,
        profile_handler::update_profile,
        // Addresses
        address_handler::list_addresses,
        address_handler::create_address,
        // Roles
        role_handler::list_roles,
        role_handler::get_role,
        role_handler::create_role,
        role_handler::update_role,
        role_handler::delete_role,
        // Bank accounts
        bank_account_handler::list_bank_accounts,
        bank_account_handler::get_bank_account,
        bank_account_handler::create_bank_account,
        // Customers
        customer_handler::list_customers,
        customer_handler::get_customer,
        customer_handler::upsert_customer,
        customer_handler::update_customer,
        customer_handler::delete_customer,
    ),
    components(
        schemas(
            SessionSnapshot,
            session_handler::CredentialsRequest,
            profile_handler::ProfileUpdateRequest,
            profile_handler::ConfirmationRequest,
            profile_handler::ProfileView,
            address_handler::AddressRequest,
            address_handler::AddressResponse,
            role_handler::RoleRequest,
            role_handler::RoleResponse,
            bank_account_handler::BankAccountRequest,
            bank_account_handler::BankAccountResponse,
            customer_handler::CustomerRequest,
            customer_handler::CustomerResponse,
        )
    ),
    tags(
        (name = "Sessions", description = "Authentication session state machine"),
        (name = "Profiles", description = "User profiles"),
        (name = "Addresses", description = "Customer addresses"),
        (name = "Roles", description = "Permission groups"),
        (name = "BankAccounts", description = "User bank accounts"),
        (name = "Customers", description = "Commerce identities")
    )
)]
pub struct ApiDoc;
