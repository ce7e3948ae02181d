use async_graphql::{Context, ErrorExtensions, FieldResult, Object, ID};

use crate::errors::ServiceError;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{Product, ProductPagination};
use crate::models::{PaginationRequest, ProductPaginationRequest};
use crate::services::validation::parse_id;

/// Service failures surface as GraphQL errors tagged with their kind.
impl ErrorExtensions for ServiceError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.kind().as_str();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

/// Root query object for GraphQL
pub struct Query;

#[Object]
impl Query {
    /// All active products, optionally filtered by a search term
    async fn products(&self, ctx: &Context<'_>, search: Option<String>) -> FieldResult<Vec<Product>> {
        let context = ctx.data::<GraphQLContext>()?;

        let products = context
            .products
            .get_all_products(search.as_deref().unwrap_or_default())
            .await
            .map_err(|e| e.extend())?;

        Ok(products.into_iter().map(Product::from).collect())
    }

    /// A single product by ID
    async fn product(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Product> {
        let context = ctx.data::<GraphQLContext>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        let product = context
            .products
            .get_product_by_id(id)
            .await
            .map_err(|e| e.extend())?;

        Ok(product.into())
    }

    async fn products_with_pagination(
        &self,
        ctx: &Context<'_>,
        page: i32,
        per_page: i32,
        search: Option<String>,
    ) -> FieldResult<ProductPagination> {
        let context = ctx.data::<GraphQLContext>()?;

        let request = ProductPaginationRequest {
            pagination: PaginationRequest::new(search.unwrap_or_default(), page.into(), per_page.into()),
            id: None,
        };

        let page = context
            .products
            .get_all_products_with_pagination(request)
            .await
            .map_err(|e| e.extend())?;

        Ok(page.into())
    }
}
