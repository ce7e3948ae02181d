use std::sync::Arc;
use uuid::Uuid;

use super::logged;
use super::validation::{
    has_min_len, MIN_CREATE_DESCRIPTION_LEN, MIN_NAME_LEN, MIN_UPDATE_DESCRIPTION_LEN,
};
use crate::errors::{RepositoryError, ServiceError};
use crate::models::{
    CreateProductRequest, Product, ProductPaginationRequest, ProductPaginationResponse,
    ProductResponse, UpdateProductRequest,
};
use crate::repositories::ProductRepository;

const OP_CREATE: &str = "create product";
const OP_GET: &str = "get product";
const OP_LIST: &str = "get list product";
const OP_UPDATE: &str = "update product";
const OP_DELETE: &str = "delete product";

fn classify(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::ProductNotFound,
        RepositoryError::UniqueViolation(_) => ServiceError::MerkAlreadyExists,
        RepositoryError::Store(err) => ServiceError::Store(err),
    }
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self, request), fields(merk = %request.merk))]
    pub async fn create_product(&self, request: CreateProductRequest) -> Result<ProductResponse, ServiceError> {
        if !has_min_len(&request.name, MIN_NAME_LEN) {
            return Err(logged(OP_CREATE, ServiceError::InvalidName));
        }

        if !has_min_len(&request.description, MIN_CREATE_DESCRIPTION_LEN) {
            return Err(logged(OP_CREATE, ServiceError::InvalidDescription));
        }

        if !valid_price(request.price) {
            return Err(logged(OP_CREATE, ServiceError::InvalidPrice));
        }

        self.ensure_merk_available(OP_CREATE, &request.merk, None).await?;

        let product = Product::new(
            request.name,
            request.description,
            request.merk,
            request.material,
            request.price,
        );

        let product = self
            .repo
            .create(None, &product)
            .await
            .map_err(|e| logged(OP_CREATE, classify(e)))?;

        tracing::info!(product_id = %product.id, "success {}", OP_CREATE);
        Ok(product.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_product_by_id(&self, id: Uuid) -> Result<ProductResponse, ServiceError> {
        let product = self.fetch(OP_GET, id).await?;
        tracing::info!(product_id = %id, "success {}", OP_GET);
        Ok(product.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_all_products(&self, search: &str) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = self
            .repo
            .list_all(None, search)
            .await
            .map_err(|e| logged(OP_LIST, classify(e)))?;

        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    #[tracing::instrument(skip(self, request), fields(page = request.pagination.page))]
    pub async fn get_all_products_with_pagination(
        &self,
        request: ProductPaginationRequest,
    ) -> Result<ProductPaginationResponse, ServiceError> {
        let page = self
            .repo
            .list_paginated(None, &request)
            .await
            .map_err(|e| logged(OP_LIST, classify(e)))?;

        tracing::info!(page = page.pagination.page, count = page.pagination.count, "success {}", OP_LIST);

        let page = page.map(ProductResponse::from);
        Ok(ProductPaginationResponse {
            data: page.items,
            pagination: page.pagination,
        })
    }

    /// Merge the present fields onto the stored product. The update path
    /// accepts shorter descriptions than creation does.
    #[tracing::instrument(skip(self, request))]
    pub async fn update_product(&self, id: Uuid, request: UpdateProductRequest) -> Result<ProductResponse, ServiceError> {
        let mut product = self.fetch(OP_UPDATE, id).await?;

        if let Some(name) = request.name {
            if !has_min_len(&name, MIN_NAME_LEN) {
                return Err(logged(OP_UPDATE, ServiceError::InvalidName));
            }
            product.name = name;
        }

        if let Some(description) = request.description {
            if !has_min_len(&description, MIN_UPDATE_DESCRIPTION_LEN) {
                return Err(logged(OP_UPDATE, ServiceError::InvalidDescription));
            }
            product.description = description;
        }

        if let Some(price) = request.price {
            if !valid_price(price) {
                return Err(logged(OP_UPDATE, ServiceError::InvalidPrice));
            }
            product.price = price;
        }

        if let Some(merk) = request.merk {
            if merk != product.merk {
                self.ensure_merk_available(OP_UPDATE, &merk, Some(product.id)).await?;
            }
            product.merk = merk;
        }

        if let Some(material) = request.material {
            product.material = material;
        }

        let product = self
            .repo
            .update(None, &product)
            .await
            .map_err(|e| logged(OP_UPDATE, classify(e)))?;

        tracing::info!(product_id = %product.id, "success {}", OP_UPDATE);
        Ok(product.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<ProductResponse, ServiceError> {
        let product = self.fetch(OP_DELETE, id).await?;

        self.repo
            .soft_delete(None, id)
            .await
            .map_err(|e| logged(OP_DELETE, classify(e)))?;

        tracing::info!(product_id = %id, "success {}", OP_DELETE);
        Ok(product.into())
    }

    async fn fetch(&self, operation: &'static str, id: Uuid) -> Result<Product, ServiceError> {
        self.repo
            .get_by_id(None, id)
            .await
            .map_err(|e| logged(operation, classify(e)))?
            .ok_or_else(|| logged(operation, ServiceError::ProductNotFound))
    }

    // Advisory only: the partial unique index on merk is authoritative.
    async fn ensure_merk_available(
        &self,
        operation: &'static str,
        merk: &str,
        owner: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let existing = self
            .repo
            .get_by_merk(None, merk)
            .await
            .map_err(|e| logged(operation, classify(e)))?;

        match existing {
            Some(other) if Some(other.id) != owner => Err(logged(operation, ServiceError::MerkAlreadyExists)),
            _ => Ok(()),
        }
    }
}
