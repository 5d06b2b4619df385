//! JSON body extractors that reject with the API error body.

use axum::{
    Json, async_trait,
    body::Bytes,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use unshift_core::DomainError;

use crate::app::errors::ApiError;

/// Field name used for errors about the request body as a whole.
const BODY: &str = "body";

/// `Json<T>`, but a missing, mistyped or unparsable body is a validation
/// failure rather than axum's plain-text rejection.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(rejected)?;
        Ok(Self(value))
    }
}

fn rejected(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "request body rejected");
    ApiError(DomainError::invalid_field(BODY, rejection.body_text()))
}

/// Arguments that are all optional: an empty body means `T::default()`.
///
/// A non-empty body must be valid JSON for `T`; the content type is not
/// checked.
#[derive(Debug)]
pub struct JsonOrDefault<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError(DomainError::invalid_field(BODY, e.body_text())))?;
        parse_or_default(&bytes).map(Self)
    }
}

fn parse_or_default<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError(DomainError::invalid_field(BODY, e.to_string())))
}
