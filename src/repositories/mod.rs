// Persistence layer: one repository per entity, all queries parameterized

pub mod product_repository;
pub mod user_repository;

pub use product_repository::{PgProductRepository, ProductRepository};
pub use user_repository::{PgUserRepository, UserRepository};

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use std::ops::{Deref, DerefMut};

/// Connection a repository call runs on: the caller's transaction when one is
/// supplied, otherwise a connection checked out from the pool.
pub enum DbConn<'a> {
    Borrowed(&'a mut PgConnection),
    Pooled(PoolConnection<Postgres>),
}

impl<'a> DbConn<'a> {
    pub async fn acquire(
        pool: &PgPool,
        tx: Option<&'a mut PgConnection>,
    ) -> Result<DbConn<'a>, sqlx::Error> {
        match tx {
            Some(conn) => Ok(DbConn::Borrowed(conn)),
            None => Ok(DbConn::Pooled(pool.acquire().await?)),
        }
    }
}

impl Deref for DbConn<'_> {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        match self {
            DbConn::Borrowed(conn) => conn,
            DbConn::Pooled(conn) => conn,
        }
    }
}

impl DerefMut for DbConn<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            DbConn::Borrowed(conn) => conn,
            DbConn::Pooled(conn) => conn,
        }
    }
}

/// Lower-cased `%term%` pattern for a case-insensitive `LIKE`, with the
/// wildcard characters in `term` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
