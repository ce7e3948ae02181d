use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::{AuthError, Claims, TokenPair, UserRole};

/// Issues and verifies the tokens handed out on login.
pub trait TokenIssuer: Send + Sync {
    fn generate(&self, subject: Uuid, role: UserRole) -> Result<TokenPair, AuthError>;
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// JWT token service for creating and validating tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: Duration,
    refresh_token_expires_in: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("access_token_expires_in", &self.access_token_expires_in)
            .field("refresh_token_expires_in", &self.refresh_token_expires_in)
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: Duration::minutes(15),
            refresh_token_expires_in: Duration::days(30),
        }
    }

    pub fn with_expiry(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_expires_in = access;
        self.refresh_token_expires_in = refresh;
        self
    }

    fn create_token(
        &self,
        user_id: Uuid,
        role: UserRole,
        expires_in: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + expires_in;

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Create an access token for a user
    pub fn create_access_token(&self, user_id: Uuid, role: UserRole) -> Result<String, AuthError> {
        self.create_token(user_id, role, self.access_token_expires_in)
    }

    /// Create a refresh token for a user
    pub fn create_refresh_token(&self, user_id: Uuid, role: UserRole) -> Result<String, AuthError> {
        self.create_token(user_id, role, self.refresh_token_expires_in)
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

}

impl TokenIssuer for JwtService {
    fn generate(&self, subject: Uuid, role: UserRole) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.create_access_token(subject, role)?,
            refresh_token: self.create_refresh_token(subject, role)?,
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token)
    }
}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeaderFormat),
    }
}
