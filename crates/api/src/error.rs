//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use cryptoiq_billing::service::EntitlementError;
use cryptoiq_core::identity::error::IdentityError;
use cryptoiq_core::store::error::StoreError;
use cryptoiq_news::aggregator::NewsError;
use cryptoiq_portfolio::PortfolioError;
use cryptoiq_portfolio::calculator::CalculatorError;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 认证失败 (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 权限不足 (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 资源未找到 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 请求参数错误 (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 存储读写失败 (500)，错误信息透传给客户端
    #[error("{0}")]
    Storage(String),

    /// 第三方服务失败 (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// 下层业务错误 (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Storage(msg) => {
                tracing::error!("Store failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::Upstream(msg) => {
                // 上游细节只记录日志
                tracing::warn!("Upstream failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service unavailable".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 请求体无法解析时统一返回 `{success:false, error}`
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Record not found".into()),
            other => ApiError::Storage(format!("Store error: {}", other)),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken => {
                ApiError::Unauthorized("Invalid or expired token".into())
            }
            IdentityError::Upstream(msg) => ApiError::Upstream(msg),
        }
    }
}

impl From<CalculatorError> for ApiError {
    fn from(err: CalculatorError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<NewsError> for ApiError {
    fn from(err: NewsError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::Validation(msg) => ApiError::BadRequest(msg),
            PortfolioError::NotFound => ApiError::NotFound("Holding not found".into()),
            PortfolioError::Store(e) => ApiError::Storage(format!("Store error: {}", e)),
            PortfolioError::Upstream(e) => ApiError::Upstream(e.to_string()),
            // 只在估值时由已落库的数据触发，不归咎于请求
            e @ PortfolioError::Overflow => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        match err {
            EntitlementError::Validation(msg) => ApiError::BadRequest(msg),
            EntitlementError::InvalidSignature => {
                ApiError::Unauthorized("Invalid signature".into())
            }
            EntitlementError::Payload(msg) => ApiError::BadRequest(msg),
            e @ EntitlementError::NotSuccessful(_) => ApiError::BadRequest(e.to_string()),
            e @ EntitlementError::OwnerMismatch => ApiError::Forbidden(e.to_string()),
            EntitlementError::Gateway(e) => ApiError::Upstream(e.to_string()),
            // 服务商会对非 2xx 的 webhook 重试
            EntitlementError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}
