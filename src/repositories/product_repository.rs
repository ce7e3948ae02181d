use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{like_pattern, DbConn};
use crate::errors::RepositoryError;
use crate::models::{Page, PaginationResponse, Product, ProductPaginationRequest};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError>;
    async fn get_by_id(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<Product>, RepositoryError>;
    async fn get_by_merk(&self, tx: Option<&mut PgConnection>, merk: &str) -> Result<Option<Product>, RepositoryError>;
    async fn list_all(&self, tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<Product>, RepositoryError>;
    async fn list_paginated(
        &self,
        tx: Option<&mut PgConnection>,
        request: &ProductPaginationRequest,
    ) -> Result<Page<Product>, RepositoryError>;
    async fn update(&self, tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError>;
    async fn soft_delete(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgProductRepository {
    db: PgPool,
}

impl PgProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const SELECT_PRODUCTS: &str = "SELECT id, name, description, merk, material, price, \
     created_at, updated_at, deleted_at FROM products";

// Search covers name, merk and material.
fn filtered<'a>(select: &str, search: &str, id: Option<Uuid>) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new(select);
    query.push(" WHERE deleted_at IS NULL");

    if !search.is_empty() {
        let pattern = like_pattern(search);
        query
            .push(" AND (LOWER(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(merk) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(material) LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(id) = id {
        query.push(" AND id = ").push_bind(id);
    }

    query
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let created = sqlx::query_as::<_, Product>(
            "INSERT INTO products (id, name, description, merk, material, price, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, name, description, merk, material, price, created_at, updated_at, deleted_at",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.merk)
        .bind(&product.material)
        .bind(product.price)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let product = filtered(SELECT_PRODUCTS, "", Some(id))
            .build_query_as::<Product>()
            .fetch_optional(&mut *conn)
            .await?;

        Ok(product)
    }

    async fn get_by_merk(&self, tx: Option<&mut PgConnection>, merk: &str) -> Result<Option<Product>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, merk, material, price, created_at, updated_at, deleted_at
             FROM products WHERE merk = $1 AND deleted_at IS NULL",
        )
        .bind(merk)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    async fn list_all(&self, tx: Option<&mut PgConnection>, search: &str) -> Result<Vec<Product>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let mut query = filtered(SELECT_PRODUCTS, search, None);
        query.push(" ORDER BY created_at DESC, id DESC");

        let products = query.build_query_as::<Product>().fetch_all(&mut *conn).await?;
        Ok(products)
    }

    async fn list_paginated(
        &self,
        tx: Option<&mut PgConnection>,
        request: &ProductPaginationRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;
        let paging = request.pagination.normalized();

        let count = filtered("SELECT COUNT(*) FROM products", &paging.search, request.id)
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await?;

        let mut query = filtered(SELECT_PRODUCTS, &paging.search, request.id);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(paging.limit())
            .push(" OFFSET ")
            .push_bind(paging.offset());

        let products = query.build_query_as::<Product>().fetch_all(&mut *conn).await?;

        Ok(Page {
            items: products,
            pagination: PaginationResponse::new(&paging, count),
        })
    }

    async fn update(&self, tx: Option<&mut PgConnection>, product: &Product) -> Result<Product, RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let updated = sqlx::query_as::<_, Product>(
            "UPDATE products
             SET name = $2, description = $3, merk = $4, material = $5, price = $6, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, name, description, merk, material, price, created_at, updated_at, deleted_at",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.merk)
        .bind(&product.material)
        .bind(product.price)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    async fn soft_delete(&self, tx: Option<&mut PgConnection>, id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = DbConn::acquire(&self.db, tx).await?;

        let result = sqlx::query("UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
