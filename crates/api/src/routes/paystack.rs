//! # 支付路由
//!
//! webhook 直接读取原始字节，签名校验必须作用于未经任何解析的请求体。

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, ApiResponse, InitializePaymentResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};

/// 服务商推送签名的请求头
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// 发起高级版付款
#[utoipa::path(
    post,
    path = "/paystack/initialize",
    tag = "支付 (Payment)",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回支付跳转地址", body = ApiResponse<InitializePaymentResponse>),
        (status = 401, description = "未认证", body = ApiErrorResponse),
        (status = 502, description = "支付服务商不可用", body = ApiErrorResponse)
    )
)]
pub async fn initialize(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<InitializePaymentResponse>>, ApiError> {
    let session = state.billing.initialize(&user).await?;
    Ok(Json(ApiResponse::ok(session.into())))
}

/// 付款完成后核验参考号
///
/// 已是高级用户时直接返回成功，不重复写入。
#[utoipa::path(
    post,
    path = "/paystack/verify",
    tag = "支付 (Payment)",
    security(("bearer_auth" = [])),
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "核验成功", body = ApiResponse<VerifyPaymentResponse>),
        (status = 400, description = "交易未成功", body = ApiErrorResponse),
        (status = 403, description = "交易不属于当前用户", body = ApiErrorResponse),
        (status = 502, description = "支付服务商不可用", body = ApiErrorResponse)
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<VerifyPaymentResponse>>, ApiError> {
    let Json(req) = payload?;
    let reference = req.reference.unwrap_or_default();
    let outcome = state.billing.verify(&user, &reference).await?;
    Ok(Json(ApiResponse::ok(VerifyPaymentResponse {
        success: true,
        message: outcome.message().to_string(),
    })))
}

/// 支付服务商 webhook
///
/// 签名错误返回 401 且不处理事件；找不到付款用户或非扣款事件同样返回 200，避免服务商重试。
#[utoipa::path(
    post,
    path = "/paystack/webhook",
    tag = "支付 (Payment)",
    params(
        ("x-paystack-signature" = String, Header, description = "请求体的 HMAC-SHA512 十六进制签名")
    ),
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "事件已接收", body = ApiResponse<String>),
        (status = 400, description = "请求体无法解析", body = ApiErrorResponse),
        (status = 401, description = "签名错误", body = ApiErrorResponse),
        (status = 500, description = "存储错误，服务商将重试", body = ApiErrorResponse)
    )
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    let outcome = state.billing.handle_webhook(&body, signature).await?;
    Ok(Json(ApiResponse::ok(outcome.message().to_string())))
}
