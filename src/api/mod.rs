// REST controllers and route assembly

pub mod health;
pub mod products;
pub mod response;
pub mod routes;
pub mod users;

pub use response::{ApiError, ApiResponse};
pub use routes::{create_routes, AppState};
