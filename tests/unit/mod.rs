// Service-level tests over the in-memory repositories

pub mod product_service_test;
