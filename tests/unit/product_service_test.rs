use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::{RacyProductRepository, TestContext};
use storefront::errors::{ErrorKind, ServiceError};
use storefront::models::{
    CreateProductRequest, PaginationRequest, ProductPaginationRequest, UpdateProductRequest,
};
use storefront::services::ProductService;

fn office_chair() -> CreateProductRequest {
    CreateProductRequest {
        name: "Office Chair".to_string(),
        description: "Ergonomic chair with lumbar support".to_string(),
        merk: "Ergoseat".to_string(),
        material: "Mesh".to_string(),
        price: 149.99,
    }
}

fn numbered(i: usize) -> CreateProductRequest {
    CreateProductRequest {
        name: format!("Product {i:02}"),
        description: "Generated catalogue entry".to_string(),
        merk: format!("Brand-{i:02}"),
        material: "Wood".to_string(),
        price: 10.0 + i as f64,
    }
}

fn paging(page: i64, per_page: i64) -> ProductPaginationRequest {
    ProductPaginationRequest {
        pagination: PaginationRequest::new("", page, per_page),
        id: None,
    }
}

#[tokio::test]
async fn test_create_and_fetch_product() {
    let ctx = TestContext::new();

    let created = ctx.products.create_product(office_chair()).await.unwrap();
    assert_eq!(created.name, "Office Chair");
    assert_eq!(created.merk, "Ergoseat");
    assert_eq!(created.price, 149.99);

    let fetched = ctx.products.get_product_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_rejects_duplicate_merk() {
    let ctx = TestContext::new();
    ctx.products.create_product(office_chair()).await.unwrap();

    let err = ctx
        .products
        .create_product(CreateProductRequest {
            name: "Gaming Chair".to_string(),
            ..office_chair()
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::MerkAlreadyExists);
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_create_validation() {
    let ctx = TestContext::new();

    let short_name = CreateProductRequest {
        name: "Desk".to_string(),
        ..office_chair()
    };
    assert_matches!(ctx.products.create_product(short_name).await, Err(ServiceError::InvalidName));

    let short_description = CreateProductRequest {
        description: "Comfy".to_string(),
        ..office_chair()
    };
    assert_matches!(
        ctx.products.create_product(short_description).await,
        Err(ServiceError::InvalidDescription)
    );

    for price in [0.0, -5.0, f64::NAN] {
        let bad_price = CreateProductRequest {
            price,
            ..office_chair()
        };
        assert_matches!(ctx.products.create_product(bad_price).await, Err(ServiceError::InvalidPrice));
    }

    assert!(ctx.products.get_all_products("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_accepts_shorter_description_than_create() {
    let ctx = TestContext::new();
    let created = ctx.products.create_product(office_chair()).await.unwrap();

    let updated = ctx
        .products
        .update_product(
            created.id,
            UpdateProductRequest {
                description: Some("Comfy".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "Comfy");
    assert_eq!(updated.name, "Office Chair");
    assert_eq!(updated.price, 149.99);

    let too_short = UpdateProductRequest {
        description: Some("Tiny".to_string()),
        ..Default::default()
    };
    assert_matches!(
        ctx.products.update_product(created.id, too_short).await,
        Err(ServiceError::InvalidDescription)
    );
}

#[tokio::test]
async fn test_update_merk_conflict() {
    let ctx = TestContext::new();
    let chair = ctx.products.create_product(office_chair()).await.unwrap();
    ctx.products.create_product(numbered(1)).await.unwrap();

    let unchanged = UpdateProductRequest {
        merk: Some("Ergoseat".to_string()),
        price: Some(99.0),
        ..Default::default()
    };
    let updated = ctx.products.update_product(chair.id, unchanged).await.unwrap();
    assert_eq!(updated.price, 99.0);

    let taken = UpdateProductRequest {
        merk: Some("Brand-01".to_string()),
        ..Default::default()
    };
    assert_matches!(
        ctx.products.update_product(chair.id, taken).await,
        Err(ServiceError::MerkAlreadyExists)
    );
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let ctx = TestContext::new();
    let created = ctx.products.create_product(office_chair()).await.unwrap();

    let deleted = ctx.products.delete_product(created.id).await.unwrap();
    assert_eq!(deleted.id, created.id);
    assert!(ctx.product_repo.raw(created.id).unwrap().is_deleted());

    let err = ctx.products.get_product_by_id(created.id).await.unwrap_err();
    assert_matches!(err, ServiceError::ProductNotFound);
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_matches!(
        ctx.products.delete_product(Uuid::new_v4()).await,
        Err(ServiceError::ProductNotFound)
    );
}

#[tokio::test]
async fn test_pagination_defaults_and_bounds() {
    let ctx = TestContext::new();
    for i in 0..25 {
        ctx.products.create_product(numbered(i)).await.unwrap();
    }

    let first = ctx.products.get_all_products_with_pagination(paging(0, 0)).await.unwrap();
    assert_eq!(first.data.len(), 10);
    assert_eq!(first.pagination.page, 1);
    assert_eq!(first.pagination.per_page, 10);
    assert_eq!(first.pagination.max_page, 3);
    assert_eq!(first.pagination.count, 25);

    let last = ctx.products.get_all_products_with_pagination(paging(3, 10)).await.unwrap();
    assert_eq!(last.data.len(), 5);

    let beyond = ctx.products.get_all_products_with_pagination(paging(9, 10)).await.unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.pagination.count, 25);
}

#[tokio::test]
async fn test_pages_concatenate_to_full_listing() {
    let ctx = TestContext::new();
    for i in 0..13 {
        ctx.products.create_product(numbered(i)).await.unwrap();
    }

    let full: Vec<Uuid> = ctx
        .products
        .get_all_products("")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();

    let mut paged = Vec::new();
    for page in 1..=3 {
        let result = ctx.products.get_all_products_with_pagination(paging(page, 5)).await.unwrap();
        paged.extend(result.data.into_iter().map(|p| p.id));
    }

    assert_eq!(paged, full);
}

#[tokio::test]
async fn test_search_matches_name_merk_and_material() {
    let ctx = TestContext::new();
    ctx.products.create_product(office_chair()).await.unwrap();
    ctx.products.create_product(numbered(1)).await.unwrap();

    assert_eq!(ctx.products.get_all_products("chair").await.unwrap().len(), 1);
    assert_eq!(ctx.products.get_all_products("ERGO").await.unwrap().len(), 1);
    assert_eq!(ctx.products.get_all_products("mesh").await.unwrap().len(), 1);
    assert_eq!(ctx.products.get_all_products("").await.unwrap().len(), 2);
    assert!(ctx.products.get_all_products("velvet").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_unique_violation_maps_to_conflict() {
    let products = ProductService::new(Arc::new(RacyProductRepository::default()));
    let chair = products.create_product(office_chair()).await.unwrap();
    products.create_product(numbered(1)).await.unwrap();

    let err = products
        .create_product(CreateProductRequest {
            name: "Gaming Chair".to_string(),
            ..office_chair()
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::MerkAlreadyExists);
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = products
        .update_product(
            chair.id,
            UpdateProductRequest {
                merk: Some("Brand-01".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::MerkAlreadyExists);
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
