// GraphQL read surface over the product service

pub mod query;
pub mod schema;
pub mod types;

pub use schema::{create_schema, graphql_routes, GraphQLContext, GraphQLSchema};
