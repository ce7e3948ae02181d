use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::{ErrorKind, ServiceError};
use crate::models::{PaginationRequest, PaginationResponse};
use crate::services::validation::parse_id;

pub const MESSAGE_FAILED_GET_DATA_FROM_BODY: &str = "failed get data from body";
pub const MESSAGE_FAILED_GET_QUERY: &str = "failed get query parameters";
pub const MESSAGE_FAILED_UUID_FORMAT: &str = "failed uuid format";

pub const MESSAGE_SUCCESS_REGISTER: &str = "success register user";
pub const MESSAGE_FAILED_REGISTER: &str = "failed register user";
pub const MESSAGE_SUCCESS_LOGIN: &str = "success login user";
pub const MESSAGE_FAILED_LOGIN: &str = "failed login user";
pub const MESSAGE_SUCCESS_CREATE_USER: &str = "success create user";
pub const MESSAGE_FAILED_CREATE_USER: &str = "failed create user";
pub const MESSAGE_SUCCESS_GET_LIST_USER: &str = "success get list user";
pub const MESSAGE_FAILED_GET_LIST_USER: &str = "failed get list user";
pub const MESSAGE_SUCCESS_GET_DETAIL_USER: &str = "success get detail user";
pub const MESSAGE_FAILED_GET_DETAIL_USER: &str = "failed get detail user";
pub const MESSAGE_SUCCESS_UPDATE_USER: &str = "success update user";
pub const MESSAGE_FAILED_UPDATE_USER: &str = "failed update user";
pub const MESSAGE_SUCCESS_DELETE_USER: &str = "success delete user";
pub const MESSAGE_FAILED_DELETE_USER: &str = "failed delete user";

pub const MESSAGE_SUCCESS_CREATE_PRODUCT: &str = "success create product";
pub const MESSAGE_FAILED_CREATE_PRODUCT: &str = "failed create product";
pub const MESSAGE_SUCCESS_GET_LIST_PRODUCT: &str = "success get list product";
pub const MESSAGE_FAILED_GET_LIST_PRODUCT: &str = "failed get list product";
pub const MESSAGE_SUCCESS_GET_DETAIL_PRODUCT: &str = "success get detail product";
pub const MESSAGE_FAILED_GET_DETAIL_PRODUCT: &str = "failed get detail product";
pub const MESSAGE_SUCCESS_UPDATE_PRODUCT: &str = "success update product";
pub const MESSAGE_FAILED_UPDATE_PRODUCT: &str = "failed update product";
pub const MESSAGE_SUCCESS_DELETE_PRODUCT: &str = "success delete product";
pub const MESSAGE_FAILED_DELETE_PRODUCT: &str = "failed delete product";

/// Success envelope: `{message, data}` plus `meta` on paginated listings.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationResponse>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            message,
            data,
            meta: None,
        }
    }

    pub fn paginated(message: &'static str, data: T, meta: PaginationResponse) -> Self {
        Self {
            message,
            data,
            meta: Some(meta),
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T: Serialize>(message: &'static str, data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::new(message, data))))
}

pub fn created<T: Serialize>(message: &'static str, data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::new(message, data))))
}

/// Failure envelope: `{message, error, data: null}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
    pub error: String,
}

impl ApiError {
    pub fn bad_request(message: &'static str, error: impl ToString) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
            error: error.to_string(),
        }
    }

    /// Business failures are the client's problem (400); store and
    /// collaborator failures are ours (500).
    pub fn service(message: &'static str, err: ServiceError) -> Self {
        let status = match err.kind() {
            ErrorKind::Store | ErrorKind::ExternalService => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Validation | ErrorKind::Conflict | ErrorKind::NotFound | ErrorKind::Auth => {
                StatusCode::BAD_REQUEST
            }
        };

        Self {
            status,
            message,
            error: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(reason = %rejection.body_text(), "{}", MESSAGE_FAILED_GET_DATA_FROM_BODY);
        Self::bad_request(MESSAGE_FAILED_GET_DATA_FROM_BODY, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(reason = %rejection.body_text(), "{}", MESSAGE_FAILED_GET_QUERY);
        Self::bad_request(MESSAGE_FAILED_GET_QUERY, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message,
            "error": self.error,
            "data": null,
        }));

        (self.status, body).into_response()
    }
}

/// Path identifiers must be well-formed UUIDs before any service call.
pub fn path_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw).map_err(|err| {
        tracing::warn!(id = raw, "{}", MESSAGE_FAILED_UUID_FORMAT);
        ApiError::service(MESSAGE_FAILED_UUID_FORMAT, err)
    })
}

/// `?search=&page=&per_page=&id=` on listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub id: Option<Uuid>,
}

impl ListQuery {
    /// Listing is paginated as soon as either paging parameter is present.
    pub fn wants_pagination(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }

    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    pub fn pagination(&self) -> PaginationRequest {
        PaginationRequest::new(
            self.search().to_string(),
            self.page.unwrap_or_default(),
            self.per_page.unwrap_or_default(),
        )
    }
}
