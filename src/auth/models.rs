use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User roles for role-based access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            _ => Err(format!("unknown user role: {s}")),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UserRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// JWT token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // Subject (user ID)
    pub role: UserRole, // User role
    pub exp: usize,     // Expiration time
    pub iat: usize,     // Issued at
    pub jti: String,    // JWT ID
}

/// Access + refresh token pair handed out on login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authenticated caller, attached to request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: Uuid,
    pub role: UserRole,
    pub jti: String,
}

impl UserSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            role: claims.role,
            jti: claims.jti.clone(),
        })
    }
}
