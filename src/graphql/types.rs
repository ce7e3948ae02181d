use async_graphql::{SimpleObject, ID};

use crate::models::{PaginationResponse, ProductPaginationResponse, ProductResponse};

#[derive(Debug, Clone, SimpleObject)]
pub struct Product {
    pub id: ID,
    pub name: String,
    pub description: String,
    pub merk: String,
    pub material: String,
    pub price: f64,
}

impl From<ProductResponse> for Product {
    fn from(product: ProductResponse) -> Self {
        Self {
            id: ID(product.id.to_string()),
            name: product.name,
            description: product.description,
            merk: product.merk,
            material: product.material,
            price: product.price,
        }
    }
}

/// Exposed as `{page, perPage, maxPage, count}`.
#[derive(Debug, Clone, Copy, SimpleObject)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub max_page: i64,
    pub count: i64,
}

impl From<PaginationResponse> for Pagination {
    fn from(pagination: PaginationResponse) -> Self {
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            max_page: pagination.max_page,
            count: pagination.count,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct ProductPagination {
    pub data: Vec<Product>,
    pub pagination: Pagination,
}

impl From<ProductPaginationResponse> for ProductPagination {
    fn from(page: ProductPaginationResponse) -> Self {
        Self {
            data: page.data.into_iter().map(Product::from).collect(),
            pagination: page.pagination.into(),
        }
    }
}
