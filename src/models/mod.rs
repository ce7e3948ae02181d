// Entities, request/response shapes and paging types

pub mod pagination;
pub mod product;
pub mod user;

pub use pagination::*;
pub use product::*;
pub use user::*;
