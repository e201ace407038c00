//! API 调用的错误类型
//!
//! 后端（FastAPI）的错误体约定为 `{"detail": ...}`，限流中间件返回 `{"error": ...}`。
//! 这里把它们统一成可以直接展示给用户的消息。

use crate::web::{HttpError, HttpResponse};
use serde::Deserialize;
use supportbot_shared::DecodeError;

pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 请求没有到达后端，或响应没有读完
    #[error("Network error: {0}")]
    Network(String),
    /// 非 2xx 响应；`message` 取后端 detail，其次状态文本
    #[error("{message}")]
    Status { status: u16, message: String },
    /// HTTP 429
    #[error("{message}")]
    RateLimited { message: String },
    /// 2xx 但响应体不符合约定
    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),
    /// 需要登录的接口，但本地没有 token
    #[error("You are not signed in")]
    MissingToken,
    /// 后端签发的 token 无法解码
    #[error("Received an invalid token: {0}")]
    InvalidToken(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
            parsed.error.filter(|e| !e.is_empty())
        }
        // 422 校验错误的 detail 是数组，原样展示
        Some(other) => Some(other.to_string()),
    }
}

impl ApiError {
    pub fn from_response(resp: &HttpResponse) -> Self {
        let message = extract_detail(&resp.body)
            .or_else(|| Some(resp.status_text.trim().to_string()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| format!("HTTP {}", resp.status));

        if resp.status == STATUS_TOO_MANY_REQUESTS {
            ApiError::RateLimited { message }
        } else {
            ApiError::Status {
                status: resp.status,
                message,
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(STATUS_TOO_MANY_REQUESTS),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(msg) => ApiError::InvalidResponse(msg),
            HttpError::RequestBuildFailed(msg) | HttpError::NetworkError(msg) => {
                ApiError::Network(msg)
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidResponse(e.to_string())
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        ApiError::InvalidToken(e.to_string())
    }
}
