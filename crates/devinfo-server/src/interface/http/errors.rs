//! HTTP 错误信封
//!
//! 404/405 会列出可用接口；500 只返回通用提示，具体原因只写日志。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devinfo_core::error::CoreError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::{error, warn};

use crate::domain::{EndpointInfo, known_endpoints};

pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// 接口层错误
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("The requested endpoint {path} does not exist")]
    NotFound { path: String },

    #[error("Method {method} is not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<EndpointInfo>>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 日志中使用的错误分类
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::MethodNotAllowed { .. } => "method_not_allowed",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            ApiError::NotFound { .. } => ErrorEnvelope {
                error: "Not Found".to_string(),
                message: self.to_string(),
                available_endpoints: Some(known_endpoints()),
            },
            ApiError::MethodNotAllowed { .. } => ErrorEnvelope {
                error: "Method Not Allowed".to_string(),
                message: self.to_string(),
                available_endpoints: Some(known_endpoints()),
            },
            ApiError::Internal(_) => ErrorEnvelope {
                error: "Internal Server Error".to_string(),
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                available_endpoints: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = self.error_type();
        match &self {
            ApiError::NotFound { path } => {
                warn!(error_type, %path, "404 Not Found: {}", path);
            }
            ApiError::MethodNotAllowed { method, path } => {
                warn!(error_type, %method, %path, "405 Method Not Allowed: {} {}", method, path);
            }
            ApiError::Internal(detail) => {
                error!(error_type, details = %detail, "500 Internal Server Error: {}", detail);
            }
        }

        (self.status_code(), Json(self.envelope())).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// CatchPanicLayer 的响应构造器：记录 panic 内容，向客户端返回通用 500
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
