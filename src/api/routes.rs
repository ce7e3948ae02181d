use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::health::health_check;
use super::products::product_routes;
use super::users::{admin_routes, public_routes, user_routes};
use crate::auth::{cors_layer, security_headers_layer, TokenIssuer};
use crate::graphql::{create_schema, graphql_routes, GraphQLSchema};
use crate::services::{ProductService, UserService};

/// Shared handler state. Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub products: ProductService,
    pub tokens: Arc<dyn TokenIssuer>,
    pub schema: GraphQLSchema,
}

impl AppState {
    pub fn new(users: UserService, products: ProductService, tokens: Arc<dyn TokenIssuer>) -> Self {
        let schema = create_schema(products.clone());
        Self {
            users,
            products,
            tokens,
            schema,
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(product_routes(state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .merge(graphql_routes(state.schema))
        .layer(TraceLayer::new_for_http())
        .layer(security_headers_layer())
        .layer(cors_layer())
}
