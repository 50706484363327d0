use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{CommandError, ConfigError};

/// Body shape shared by every command-surface route.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ApiResult<T>(pub StatusCode, pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for ApiResult<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

pub fn ok<T>(data: T) -> ApiResult<T> {
    ApiResult(
        StatusCode::OK,
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        },
    )
}

/// `{"success": true}` with no data.
pub fn done() -> ApiResult<()> {
    ApiResult(
        StatusCode::OK,
        ApiResponse {
            success: true,
            data: None,
            error: None,
        },
    )
}

pub fn fail<T>(status: StatusCode, error: impl Into<String>) -> ApiResult<T> {
    ApiResult(
        status,
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        },
    )
}

pub trait IntoApiResult<T> {
    fn into_api_result(self) -> ApiResult<T>;
}

impl<T> IntoApiResult<T> for Result<T, ConfigError> {
    fn into_api_result(self) -> ApiResult<T> {
        match self {
            Ok(data) => ok(data),
            Err(e) => {
                let status = match &e {
                    ConfigError::UnknownSection(_) | ConfigError::SourceNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    ConfigError::InvalidSettings { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => {
                        tracing::error!(error = %e, "failed to persist settings");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                fail(status, e.to_string())
            }
        }
    }
}

impl<T> IntoApiResult<T> for Result<T, CommandError> {
    fn into_api_result(self) -> ApiResult<T> {
        match self {
            Ok(data) => ok(data),
            Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }
}

impl<T> IntoApiResult<T> for Option<T> {
    fn into_api_result(self) -> ApiResult<T> {
        match self {
            Some(data) => ok(data),
            None => fail(StatusCode::NOT_FOUND, "NOT_FOUND"),
        }
    }
}
