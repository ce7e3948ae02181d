// Environment configuration, database bootstrap and seeding

pub mod app;
pub mod database;
pub mod seeding;

pub use app::AppConfig;
pub use database::{rollback_migrations, run_migrations, DatabaseConfig};
pub use seeding::DatabaseSeeder;

use anyhow::{Context, Result};
use std::env;

/// Unset falls back to `default`; set but unparsable is an error.
pub(crate) fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
