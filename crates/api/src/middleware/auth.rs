//! # 鉴权中间件
//!
//! 将 `Authorization: Bearer <token>` 交给外部身份服务校验，
//! 校验通过后确保本地档案存在，并把 `Profile` 注入 request extensions。

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, header};
use axum::middleware::Next;
use axum::response::Response;

use cryptoiq_core::store::port::Profile;

use crate::error::ApiError;
use crate::server::AppState;

/// 受保护路由的鉴权中间件
///
/// # Logic
/// 1. CORS 预检请求 (`OPTIONS`) 直接放行。
/// 2. 缺少或格式错误的 Bearer 凭证返回 401，不进入 handler。
/// 3. 凭证交由身份服务校验，失效返回 401，身份服务不可用返回 502。
/// 4. 首次访问的用户以 free 等级建档。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let token = match bearer_token(req.headers()) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Rejected {} {}: {}", req.method(), req.uri().path(), e);
            return Err(e);
        }
    };

    let profile = resolve_profile(&state, &token).await?;
    req.extensions_mut().insert(profile);

    Ok(next.run(req).await)
}

/// 可选鉴权：携带有效凭证时注入用户，否则按匿名请求处理，从不拒绝。
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Ok(token) = bearer_token(req.headers()) {
        match resolve_profile(&state, &token).await {
            Ok(profile) => {
                req.extensions_mut().insert(profile);
            }
            Err(e) => tracing::debug!("Ignoring credential on optional route: {}", e),
        }
    }
    next.run(req).await
}

/// 从请求头提取 Bearer 凭证
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".into()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| ApiError::Unauthorized("Invalid Bearer format".into()))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ApiError::Unauthorized("Invalid Bearer format".into()));
    }
    Ok(token.to_string())
}

async fn resolve_profile(state: &AppState, token: &str) -> Result<Profile, ApiError> {
    let user = state.identity.verify_token(token).await.map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(state.profiles.ensure_profile(&user.id, &user.email).await?)
}

/// 在提取器中获取当前用户的快捷方式
pub struct CurrentUser(pub Profile);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<Profile>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Missing user context".into()))?;
        Ok(CurrentUser(user))
    }
}

/// 供 `Option<CurrentUser>` 在可选鉴权路由上使用
impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Profile>().cloned().map(CurrentUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer  xyz ")).unwrap(), "xyz");
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&headers("Bearer")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }
}
