use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use unshift_core::{DomainError, ErrorKind, FieldErrors};

/// Handler error: a domain error rendered as a JSON body.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<axum::Json<T>, ApiError>;

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self(value)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        if kind == ErrorKind::Internal {
            tracing::error!(error = %self.0, "request failed");
        }
        json_error(status_for(kind), kind.as_str(), self.0.to_string(), self.0.fields())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>, fields: Option<&FieldErrors>) -> Response {
    let mut body = json!({
        "error": code,
        "message": message.into(),
    });
    if let Some(fields) = fields {
        body["fields"] = json!(fields);
    }
    (status, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_status() {
        let statuses = [
            ErrorKind::Unauthenticated,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::ValidationFailed,
            ErrorKind::Internal,
        ]
        .map(status_for);
        assert_eq!(
            statuses,
            [
                StatusCode::UNAUTHORIZED,
                StatusCode::FORBIDDEN,
                StatusCode::NOT_FOUND,
                StatusCode::BAD_REQUEST,
                StatusCode::INTERNAL_SERVER_ERROR
            ]
        );
    }

    #[test]
    fn validation_errors_carry_fields() {
        let res = ApiError(DomainError::invalid_field("email", "Email not found")).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
