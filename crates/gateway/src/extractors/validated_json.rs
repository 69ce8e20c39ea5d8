//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON body that has passed its `validator` rules.
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
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(first_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// The first rule message, or a generic one when the rule has none.
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .next()
        .and_then(|(field, errs)| {
            errs.first().map(|err| match &err.message {
                Some(msg) => msg.to_string(),
                None => format!("Polje {field} nije ispravno."),
            })
        })
        .unwrap_or_else(|| "Greška u validaciji podataka.".to_string())
}
