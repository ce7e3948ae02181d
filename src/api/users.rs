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
use crate::auth::{admin_only_middleware, jwt_auth_middleware};
use crate::models::{
    CreateUserRequest, LoginResponse, LoginUserRequest, RegisterUserRequest,
    RegisterUserResponse, UpdateUserRequest, UserPaginationRequest, UserResponse,
};

/// `POST /register`, `POST /login`
pub fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

/// `POST|GET /users`, admin role required
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// `GET|PATCH|DELETE /users/:id`, any authenticated caller
pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterUserRequest>, ApiError>,
) -> ApiResult<RegisterUserResponse> {
    let user = state
        .users
        .register(request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_REGISTER, e))?;

    created(MESSAGE_SUCCESS_REGISTER, user)
}

#[tracing::instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginUserRequest>, ApiError>,
) -> ApiResult<LoginResponse> {
    let tokens = state
        .users
        .login(request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_LOGIN, e))?;

    ok(MESSAGE_SUCCESS_LOGIN, tokens)
}

#[tracing::instrument(skip_all)]
async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> ApiResult<UserResponse> {
    let user = state
        .users
        .create_user(request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_CREATE_USER, e))?;

    created(MESSAGE_SUCCESS_CREATE_USER, user)
}

#[tracing::instrument(skip_all)]
async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> ApiResult<Vec<UserResponse>> {
    if !query.wants_pagination() {
        let users = state
            .users
            .get_all_users(query.search())
            .await
            .map_err(|e| ApiError::service(MESSAGE_FAILED_GET_LIST_USER, e))?;

        return ok(MESSAGE_SUCCESS_GET_LIST_USER, users);
    }

    let request = UserPaginationRequest {
        pagination: query.pagination(),
        id: query.id,
    };
    let page = state
        .users
        .get_all_users_with_pagination(request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_GET_LIST_USER, e))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::paginated(
            MESSAGE_SUCCESS_GET_LIST_USER,
            page.data,
            page.pagination,
        )),
    ))
}

#[tracing::instrument(skip_all)]
async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserResponse> {
    let id = path_id(&id)?;
    let user = state
        .users
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_GET_DETAIL_USER, e))?;

    ok(MESSAGE_SUCCESS_GET_DETAIL_USER, user)
}

#[tracing::instrument(skip_all)]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> ApiResult<UserResponse> {
    let id = path_id(&id)?;
    let user = state
        .users
        .update_user(id, request)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_UPDATE_USER, e))?;

    ok(MESSAGE_SUCCESS_UPDATE_USER, user)
}

#[tracing::instrument(skip_all)]
async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserResponse> {
    let id = path_id(&id)?;
    let user = state
        .users
        .delete_user(id)
        .await
        .map_err(|e| ApiError::service(MESSAGE_FAILED_DELETE_USER, e))?;

    ok(MESSAGE_SUCCESS_DELETE_USER, user)
}
