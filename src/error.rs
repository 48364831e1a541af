use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

pub const MISSING_URL: &str = "目标 URL 不能为空";
pub const INVALID_URL: &str = "URL 格式无效";
pub const CODE_TOO_LONG: &str = "短码不能超过 32 个字符";

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("短码已存在")]
    Conflict,
    #[error("请求体格式无效")]
    MalformedBody(#[from] JsonRejection),
    #[error("未授权")]
    Unauthorized,
    #[error("未知接口")]
    UnknownRoute,
    #[error("短链接不存在")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
    #[error("corrupt link record: {0}")]
    Codec(#[from] serde_json::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict | AppError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UnknownRoute | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // redirect failures are plain text, everything else is api json
            AppError::NotFound => (status, self.to_string()).into_response(),
            AppError::Storage(_) | AppError::Codec(_) => {
                error!(error = %self, "Internal error");
                (status, Json(json!({"error": "服务器内部错误"}))).into_response()
            }
            AppError::MalformedBody(ref rejection) => {
                error!(error = ?rejection, "JSON parsing error");
                (status, Json(json!({"error": self.to_string()}))).into_response()
            }
            _ => (status, Json(json!({"error": self.to_string()}))).into_response(),
        }
    }
}
