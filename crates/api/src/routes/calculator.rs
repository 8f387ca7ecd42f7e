//! # 收益计算器路由

use axum::Json;
use axum::extract::rejection::JsonRejection;

use cryptoiq_portfolio::calculator::{ProfitInput, calculate as compute};

use crate::error::ApiError;
use crate::types::{ApiErrorResponse, ApiResponse, CalculateRequest, CalculateResponse};

/// 根据投入金额、买入价和卖出价计算收益
///
/// 三个字段必须全部存在且大于 0；币数保留 8 位小数，其余保留 2 位。
#[utoipa::path(
    post,
    path = "/calculate",
    tag = "计算器 (Calculator)",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "计算成功", body = ApiResponse<CalculateResponse>),
        (status = 400, description = "字段缺失或非正数", body = ApiErrorResponse)
    )
)]
pub async fn calculate(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CalculateResponse>>, ApiError> {
    let Json(req) = payload?;
    let report = compute(&ProfitInput::from(req))?;
    Ok(Json(ApiResponse::ok(report.into())))
}
