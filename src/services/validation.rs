use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const MIN_NAME_LEN: usize = 5;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_CREATE_DESCRIPTION_LEN: usize = 8;
pub const MIN_UPDATE_DESCRIPTION_LEN: usize = 5;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Email validation
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 255 && EMAIL_RE.is_match(email)
}

/// Length check in characters, not bytes.
pub fn has_min_len(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn parse_id(id: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(id.trim()).map_err(|_| ServiceError::InvalidIdFormat)
}
