use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeaderFormat
            | AuthError::Jwt(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::FORBIDDEN => "access denied",
            _ => "authentication failed",
        };

        let body = Json(json!({
            "message": message,
            "error": self.to_string(),
            "data": null,
        }));

        (status, body).into_response()
    }
}
