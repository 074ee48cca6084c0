//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::{AppError, FieldErrors};

/// JSON body extractor that runs schema validation before the handler.
///
/// Rejections surface as the field -> message mapping used by every
/// validation failure in the API.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(FieldErrors::single("body", e.body_text())))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validator output into the field -> message mapping.
pub fn field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, field_failures) in errors.field_errors() {
        let message = field_failures
            .first()
            .and_then(|failure| failure.message.as_ref())
            .map(|message| message.to_string())
            .unwrap_or_else(|| format!("{field} is invalid"));
        fields.insert(field.to_string(), message);
    }
    fields
}
