use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{like_pattern, DbConn};
use crate::errors::RepositoryError;
use crate::models::{Page, PaginationResponse, User, UserPaginationRequest};

/// Every method takes an optional caller-owned transaction. When it is
/// `None` the call runs on a pooled connection. Dropping the returned future
/// cancels the in-flight query.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError>;
    async fn get_by_id(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn get_by_email(&self, tx: Option<&mut PgConnection>, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn list_all(&self, tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<User>, RepositoryError>;
    async fn list_paginated(
        &self,
        tx: Option<&mut PgConnection>,
        request: &UserPaginationRequest,
    ) -> Result<Page<User>, RepositoryError>;
    async fn update(&self, tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError>;
    async fn soft_delete(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const SELECT_USERS: &str = "SELECT id, name, email, password, phone_number, address, role, \
     created_at, updated_at, deleted_at FROM users";

/// Active users, optionally narrowed by a search term over name and email
/// and by an exact id.
fn filtered<'a>(select: &str, search: &str, id: Option<Uuid>) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new(select);
    query.push(" WHERE deleted_at IS NULL");

    if !search.is_empty() {
        let pattern = like_pattern(search);
        query
            .push(" AND (LOWER(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(email) LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(id) = id {
        query.push(" AND id = ").push_bind(id);
    }

    query
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password, phone_number, address, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, name, email, password, phone_number, address, role, created_at, updated_at, deleted_at",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let user = filtered(SELECT_USERS, "", Some(id))
            .build_query_as::<User>()
            .fetch_optional(&mut *conn)
            .await?;

        Ok(user)
    }

    async fn get_by_email(&self, tx: Option<&mut PgConnection>, email: &str) -> Result<Option<User>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, phone_number, address, role, created_at, updated_at, deleted_at
             FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    async fn list_all(&self, tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<User>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let mut query = filtered(SELECT_USERS, search, None);
        query.push(" ORDER BY created_at DESC, id DESC");

        let users = query.build_query_as::<User>().fetch_all(&mut *conn).await?;
        Ok(users)
    }

    async fn list_paginated(
        &self,
        tx: Option<&mut PgConnection>,
        request: &UserPaginationRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;
        let paging = request.pagination.normalized();

        let count = filtered("SELECT COUNT(*) FROM users", &paging.search, request.id)
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await?;

        let mut query = filtered(SELECT_USERS, &paging.search, request.id);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(paging.limit())
            .push(" OFFSET ")
            .push_bind(paging.offset());

        let users = query.build_query_as::<User>().fetch_all(&mut *conn).await?;

        Ok(Page {
            items: users,
            pagination: PaginationResponse::new(&paging, count),
        })
    }

    async fn update(&self, tx: Option<&mut PgConnection>, user: &User) -> Result<User, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users
             SET name = $2, email = $3, password = $4, phone_number = $5, address = $6, role = $7,
                 updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, name, email, password, phone_number, address, role, created_at, updated_at, deleted_at",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(user.role.as_str())
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    async fn soft_delete(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let result = sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
