use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use axum::{
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};

use crate::graphql::query::Query;
use crate::services::ProductService;

/// GraphQL context containing shared application state
pub struct GraphQLContext {
    pub products: ProductService,
}

pub type GraphQLSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub fn create_schema(products: ProductService) -> GraphQLSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(GraphQLContext { products })
        .finish()
}

/// `POST /graphql`, `GET /playground`
pub fn graphql_routes(schema: GraphQLSchema) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/playground", get(playground))
        .layer(Extension(schema))
}

async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(request).await)
}

async fn playground() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
