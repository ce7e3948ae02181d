use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password")]
    HashingFailed(#[source] bcrypt::BcryptError),
    #[error("Failed to verify password")]
    VerificationFailed(#[source] bcrypt::BcryptError),
}

/// One-way password digest used for stored credentials.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;
    fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, PasswordError>;
}

/// bcrypt-backed hasher
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        hash(plaintext, self.cost).map_err(PasswordError::HashingFailed)
    }

    fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, PasswordError> {
        verify(plaintext, digest).map_err(PasswordError::VerificationFailed)
    }
}
