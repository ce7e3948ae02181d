use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;

use super::response::*;
use super::routes::AppState;
use crate::auth::jwt_auth_middleware;
use crate::models::{
    CreateProductRequest, ProductPaginationRequest, ProductResponse, UpdateProductRequest,
};

/// Product CRUD, any authenticated caller
pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip_all)]
async fn create_product(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateProductRequest>, ApiError>,
) -> ApiResult<ProductResponse> {
    let product = state
        .products
        .create_product(request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_CREATE_PRODUCT, e))?;

    created(MESSAGE_SUCCESS_CREATE_PRODUCT, product)
}

#[tracing::instrument(skip_all)]
async fn list_products(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> ApiResult<Vec<ProductResponse>> {
    if !query.wants_pagination() {
        let products = state
            .products
            .get_all_products(query.search())
            .await
            .map_err(|e| ApiError::service(MESSAGE_FAILED_GET_LIST_PRODUCT, e))?;

        return ok(MESSAGE_SUCCESS_GET_LIST_PRODUCT, products);
    }

    let request = ProductPaginationRequest {
        pagination: query.pagination(),
        id: query.id,
    };
    let page = state
        .products
        .get_all_products_with_pagination(request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_GET_LIST_PRODUCT, e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::paginated(
            MESSAGE_SUCCESS_GET_LIST_PRODUCT,
            page.data,
            page.pagination,
        )),
    ))
}

#[tracing::instrument(skip_all)]
async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ProductResponse> {
    let id = path_id(&id)?;
    let product = state
        .products
        .get_product_by_id(id)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_GET_DETAIL_PRODUCT, e))?;

    ok(MESSAGE_SUCCESS_GET_DETAIL_PRODUCT, product)
}

#[tracing::instrument(skip_all)]
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProductRequest>, ApiError>,
) -> ApiResult<ProductResponse> {
    let id = path_id(&id)?;
    let product = state
        .products
        .update_product(id, request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_UPDATE_PRODUCT, e))?;

    ok(MESSAGE_SUCCESS_UPDATE_PRODUCT, product)
}

#[tracing::instrument(skip_all)]
async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ProductResponse> {
    let id = path_id(&id)?;
    let product = state
        .products
        .delete_product(id)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_DELETE_PRODUCT, e))?;

    ok(MESSAGE_SUCCESS_DELETE_PRODUCT, product)
}
