//! # 持仓路由
//!
//! 所有接口都只作用于调用方自己的持仓；操作他人的记录与记录不存在一样返回 404。

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use cryptoiq_portfolio::service::HoldingInput;

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, ApiResponse, HoldingRequest, HoldingResponse, PortfolioSummaryResponse,
};

/// 列出当前用户的持仓 (最新在前)
#[utoipa::path(
    get,
    path = "/portfolio",
    tag = "持仓 (Portfolio)",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<Vec<HoldingResponse>>),
        (status = 401, description = "未认证", body = ApiErrorResponse),
        (status = 500, description = "存储错误", body = ApiErrorResponse)
    )
)]
pub async fn list_holdings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<HoldingResponse>>>, ApiError> {
    let holdings = state.holdings.list(&user.id).await?;
    Ok(Json(ApiResponse::ok(
        holdings.into_iter().map(Into::into).collect(),
    )))
}

/// 新增一笔持仓
#[utoipa::path(
    post,
    path = "/portfolio",
    tag = "持仓 (Portfolio)",
    security(("bearer_auth" = [])),
    request_body = HoldingRequest,
    responses(
        (status = 200, description = "创建成功", body = ApiResponse<HoldingResponse>),
        (status = 400, description = "字段非法", body = ApiErrorResponse),
        (status = 401, description = "未认证", body = ApiErrorResponse)
    )
)]
pub async fn create_holding(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<HoldingRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<HoldingResponse>>, ApiError> {
    let Json(req) = payload?;
    let holding = state
        .holdings
        .create(&user.id, &HoldingInput::from(req))
        .await?;
    Ok(Json(ApiResponse::ok(holding.into())))
}

/// 整体更新一笔持仓
#[utoipa::path(
    put,
    path = "/portfolio/{id}",
    tag = "持仓 (Portfolio)",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "持仓记录 ID")
    ),
    request_body = HoldingRequest,
    responses(
        (status = 200, description = "更新成功", body = ApiResponse<HoldingResponse>),
        (status = 400, description = "字段非法", body = ApiErrorResponse),
        (status = 404, description = "记录不存在", body = ApiErrorResponse)
    )
)]
pub async fn update_holding(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<HoldingRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<HoldingResponse>>, ApiError> {
    let Json(req) = payload?;
    let holding = state
        .holdings
        .update(&user.id, &id, &HoldingInput::from(req))
        .await?;
    Ok(Json(ApiResponse::ok(holding.into())))
}

/// 删除一笔持仓
#[utoipa::path(
    delete,
    path = "/portfolio/{id}",
    tag = "持仓 (Portfolio)",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "持仓记录 ID")
    ),
    responses(
        (status = 200, description = "删除成功，返回被删除的 ID", body = ApiResponse<String>),
        (status = 404, description = "记录不存在", body = ApiErrorResponse)
    )
)]
pub async fn delete_holding(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state.holdings.delete(&user.id, &id).await?;
    Ok(Json(ApiResponse::ok(id)))
}

/// 组合估值汇总
///
/// 以实时报价计算每笔持仓与整体的投入、现值、盈亏与收益率。
#[utoipa::path(
    get,
    path = "/portfolio/summary",
    tag = "持仓 (Portfolio)",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "估值成功", body = ApiResponse<PortfolioSummaryResponse>),
        (status = 500, description = "存储错误", body = ApiErrorResponse),
        (status = 502, description = "报价服务不可用 (仅 fail 策略)", body = ApiErrorResponse)
    )
)]
pub async fn get_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<PortfolioSummaryResponse>>, ApiError> {
    let summary = state.valuation.summarize(&user.id).await?;
    Ok(Json(ApiResponse::ok(summary.into())))
}
