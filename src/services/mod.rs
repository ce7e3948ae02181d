// Business logic services

pub mod product_service;
pub mod user_service;
pub mod validation;

pub use product_service::ProductService;
pub use user_service::UserService;

use crate::errors::{ErrorKind, ServiceError};

/// Log a failure once, at the point where it is classified, and hand it back.
pub(crate) fn logged(operation: &'static str, err: ServiceError) -> ServiceError {
    match err.kind() {
        ErrorKind::Store | ErrorKind::ExternalService => {
            tracing::error!(error = ?err, kind = %err.kind(), "failed {}", operation);
        }
        _ => {
            tracing::warn!(reason = %err, kind = %err.kind(), "failed {}", operation);
        }
    }
    err
}
