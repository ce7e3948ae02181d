use axum::{
    extract::{Request, State},
    http::{
        header::{HeaderName, AUTHORIZATION},
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::auth::{extract_bearer_token, AuthError, TokenIssuer, UserRole, UserSession};

/// JWT authentication middleware
pub async fn jwt_auth_middleware(
    State(tokens): State<Arc<dyn TokenIssuer>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;

    let claims = tokens.verify(token)?;
    let session = UserSession::from_claims(&claims).map_err(|_| AuthError::InvalidToken)?;

    tracing::debug!(user_id = %session.user_id, role = %session.role, "request authenticated");
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Admin-only middleware. Must run after `jwt_auth_middleware`.
pub async fn admin_only_middleware(request: Request, next: Next) -> Result<Response, AuthError> {
    let session = request
        .extensions()
        .get::<UserSession>()
        .ok_or(AuthError::InsufficientPermissions)?;

    if session.role != UserRole::Admin {
        tracing::warn!(user_id = %session.user_id, "admin route refused");
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Security headers middleware
pub fn security_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}
