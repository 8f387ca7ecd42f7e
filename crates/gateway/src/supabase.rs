use async_trait::async_trait;
use cryptoiq_core::identity::error::IdentityError;
use cryptoiq_core::identity::port::{AuthUser, IdentityProvider};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// # Summary
/// Supabase Auth 身份校验实现。
///
/// # Invariants
/// - 每次调用都请求 `GET {url}/auth/v1/user`，不缓存结果。
/// - 401/403 视为凭证无效，其余失败视为上游错误。
#[derive(Clone)]
pub struct SupabaseIdentity {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseIdentity {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client =
            crate::build_client(timeout).map_err(|e| IdentityError::Upstream(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        })
    }
}

#[derive(Deserialize)]
struct SupabaseUser {
    id: String,
    email: Option<String>,
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn verify_token(&self, token: &str) -> Result<AuthUser, IdentityError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityError::InvalidToken);
        }

        let resp = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(IdentityError::InvalidToken);
            }
            s => {
                warn!("Identity service answered {}", s);
                return Err(IdentityError::Upstream(format!("status {}", s.as_u16())));
            }
        }

        let user: SupabaseUser = resp
            .json()
            .await
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;

        if user.id.is_empty() {
            return Err(IdentityError::InvalidToken);
        }

        Ok(AuthUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
        })
    }
}
