//! # 新闻路由
//!
//! `tier=premium` 只有在请求携带有效凭证且档案等级为 premium 时才生效，
//! 其余情况一律按免费用户截取，不报错。

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use utoipa::IntoParams;

use cryptoiq_core::common::Tier;

use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiResponse, NewsItemResponse};

#[derive(Debug, Deserialize, IntoParams)]
pub struct NewsQuery {
    /// 请求的等级 (`free` 或 `premium`)
    pub tier: Option<String>,
}

/// 计算本次请求实际生效的等级
pub fn effective_tier(requested: Option<&str>, user: Option<&CurrentUser>) -> Tier {
    let requested = requested
        .and_then(|t| t.parse::<Tier>().ok())
        .unwrap_or_default();
    let entitled = user.is_some_and(|CurrentUser(p)| p.role.is_premium());
    if requested.is_premium() && entitled {
        Tier::Premium
    } else {
        Tier::Free
    }
}

/// 获取最新加密货币新闻
///
/// 免费用户最多 3 条，高级用户最多 10 条，按源站顺序返回。
#[utoipa::path(
    get,
    path = "/news",
    tag = "新闻 (News)",
    params(NewsQuery),
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "新闻列表", body = ApiResponse<Vec<NewsItemResponse>>),
        (status = 502, description = "新闻源不可用且无缓存", body = ApiErrorResponse)
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<ApiResponse<Vec<NewsItemResponse>>>, ApiError> {
    let tier = effective_tier(query.tier.as_deref(), user.as_ref());
    let items = state.news.latest(tier).await?;
    Ok(Json(ApiResponse::ok(
        items.into_iter().map(Into::into).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoiq_core::store::port::Profile;

    fn user(role: Tier) -> CurrentUser {
        CurrentUser(Profile {
            id: "u1".into(),
            email: "u1@example.com".into(),
            role,
        })
    }

    #[test]
    fn test_premium_requires_entitlement() {
        assert_eq!(effective_tier(Some("premium"), None), Tier::Free);
        assert_eq!(effective_tier(Some("premium"), Some(&user(Tier::Free))), Tier::Free);
        assert_eq!(
            effective_tier(Some("Premium"), Some(&user(Tier::Premium))),
            Tier::Premium
        );
        // 高级用户未显式请求 premium 时按免费截取
        assert_eq!(effective_tier(None, Some(&user(Tier::Premium))), Tier::Free);
        assert_eq!(effective_tier(Some("gold"), Some(&user(Tier::Premium))), Tier::Free);
    }
}
