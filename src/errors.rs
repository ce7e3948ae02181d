use std::fmt;
use thiserror::Error;

use crate::auth::{AuthError, PasswordError};

/// Raw persistence failure as surfaced by a repository.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database error: {0}")]
    Store(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                RepositoryError::UniqueViolation(constraint)
            }
            other => RepositoryError::Store(other),
        }
    }
}

/// Coarse error taxonomy shared by every transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Auth,
    Store,
    ExternalService,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Conflict => "CONFLICT_ERROR",
            ErrorKind::NotFound => "NOT_FOUND_ERROR",
            ErrorKind::Auth => "AUTH_ERROR",
            ErrorKind::Store => "STORE_ERROR",
            ErrorKind::ExternalService => "EXTERNAL_SERVICE_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the service layer. Controllers and resolvers only ever
/// look at these, never at store-specific shapes.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid id format")]
    InvalidIdFormat,
    #[error("name must be at least 5 characters")]
    InvalidName,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("password must be at least 8 characters")]
    InvalidPassword,
    #[error("new password must differ from the current password")]
    PasswordSame,
    #[error("description is too short")]
    InvalidDescription,
    #[error("price must be greater than 0")]
    InvalidPrice,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("merk already exists")]
    MerkAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("invalid email or password")]
    InvalidLoginCredential,
    #[error("failed to generate token")]
    TokenGenerationFailed(#[source] AuthError),
    #[error("failed to process password")]
    PasswordHashing(#[source] PasswordError),
    #[error("database error")]
    Store(#[source] sqlx::Error),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidIdFormat
            | ServiceError::InvalidName
            | ServiceError::InvalidEmail
            | ServiceError::InvalidPassword
            | ServiceError::PasswordSame
            | ServiceError::InvalidDescription
            | ServiceError::InvalidPrice => ErrorKind::Validation,
            ServiceError::EmailAlreadyExists | ServiceError::MerkAlreadyExists => {
                ErrorKind::Conflict
            }
            ServiceError::UserNotFound | ServiceError::ProductNotFound => ErrorKind::NotFound,
            ServiceError::InvalidLoginCredential => ErrorKind::Auth,
            ServiceError::TokenGenerationFailed(_) | ServiceError::PasswordHashing(_) => {
                ErrorKind::ExternalService
            }
            ServiceError::Store(_) => ErrorKind::Store,
        }
    }
}
