// Error types for the host framework

use crate::HttpResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::BadRequest(_) | Error::Deserialization(_) => 400,
            Error::Forbidden(_) => 403,
            Error::RouteNotFound(_) => 404,
            Error::MethodNotAllowed(_) => 405,
            Error::Serialization(_) | Error::Internal(_) | Error::Io(_) => 500,
        }
    }

    /// The message placed in the JSON error body.
    ///
    /// Client errors expose their detail verbatim; server errors are masked.
    pub fn message(&self) -> String {
        match self {
            Error::BadRequest(msg)
            | Error::Forbidden(msg)
            | Error::RouteNotFound(msg)
            | Error::MethodNotAllowed(msg)
            | Error::Deserialization(msg) => msg.clone(),
            _ => "Internal Server Error".to_string(),
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Render this error as a `{"message": ...}` JSON response.
    pub fn to_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "message": self.message() });
        HttpResponse::new(self.status_code())
            .with_header("Content-Type".to_string(), "application/json".to_string())
            .with_body(body.to_string().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::BadRequest("x".into()).status_code(), 400);
        assert_eq!(Error::Forbidden("x".into()).status_code(), 403);
        assert_eq!(Error::RouteNotFound("x".into()).status_code(), 404);
        assert_eq!(Error::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_client_error_body_keeps_message() {
        let response = Error::BadRequest("INVALID_JWT".into()).to_response();
        assert_eq!(response.status, 400);

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["message"], "INVALID_JWT");
    }

    #[test]
    fn test_server_error_body_is_masked() {
        let err = Error::Internal("db password leaked".into());
        assert!(err.is_server_error());
        assert_eq!(err.message(), "Internal Server Error");
    }
}
