use crate::identity::error::IdentityError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// # Summary
/// 身份服务确认后的用户身份。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// # Summary
/// 外部身份服务接口：以 Bearer 凭证换取已验证的用户身份。
///
/// # Invariants
/// - 实现不得缓存验证结果，每次调用都以身份服务的实时判定为准。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<AuthUser, IdentityError>;
}
