use axum::Json;

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::types::{ApiErrorResponse, ApiResponse, ProfileResponse};

/// 获取当前用户档案 (含权益等级)
#[utoipa::path(
    get,
    path = "/profile",
    tag = "用户 (Profile)",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<ProfileResponse>),
        (status = 401, description = "未认证", body = ApiErrorResponse)
    )
)]
pub async fn get_profile(
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    Ok(Json(ApiResponse::ok(user.into())))
}
