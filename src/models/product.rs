use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::pagination::{PaginationRequest, PaginationResponse};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub merk: String,
    pub material: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(name: String, description: String, merk: String, material: String, price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            merk,
            material,
            price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub merk: String,
    #[serde(default)]
    pub material: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub merk: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub merk: String,
    pub material: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            merk: product.merk,
            material: product.material,
            price: product.price,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductPaginationRequest {
    pub pagination: PaginationRequest,
    pub id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductPaginationResponse {
    pub data: Vec<ProductResponse>,
    #[serde(flatten)]
    pub pagination: PaginationResponse,
}
