//! Application services layer - Use cases spanning multiple entities.
//!
//! Handlers stay thin; anything transactional or shared between
//! resources lives here.

pub mod account;
pub mod customers;
