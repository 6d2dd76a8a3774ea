//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::db::RepositoryError;
use crate::models::IdParseError;

/// Error response body: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
///
/// Status codes are part of the public contract: a missing body field is a
/// 404, and any identifier or store failure is a 504.
#[derive(Debug)]
pub enum AppError {
    /// Required request body field absent
    MissingField(&'static str),
    /// Request body could not be turned into the expected record
    BadRequest(String),
    /// Identifier string is not a valid object id
    InvalidId(IdParseError),
    /// Store failure, including not-found
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidId(_) | AppError::Repository(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::MissingField(field) => {
                format!("could not find {} value in request body", field)
            }
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InvalidId(e) => e.to_string(),
            AppError::Repository(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        match self {
            AppError::Repository(_) => error!(status = status.as_u16(), "{}", message),
            _ => warn!(status = status.as_u16(), "{}", message),
        }

        (status, Json(ErrorEnvelope::new(message))).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<IdParseError> for AppError {
    fn from(err: IdParseError) -> Self {
        AppError::InvalidId(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::MissingField("campaignId").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidId(IdParseError::new("shop", "x")).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Repository(RepositoryError::not_found("gone")).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            AppError::MissingField("campaignId").message(),
            "could not find campaignId value in request body"
        );
    }
}
