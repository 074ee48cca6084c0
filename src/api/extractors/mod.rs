//! Custom extractors.

pub mod validated_json;

pub use validated_json::{field_errors, ValidatedJson};
