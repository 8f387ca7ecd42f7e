use thiserror::Error;

/// # Summary
/// 身份验证错误。
#[derive(Error, Debug)]
pub enum IdentityError {
    /// 凭证无效或已过期
    #[error("Invalid or expired token")]
    InvalidToken,
    /// 身份服务不可达或返回异常
    #[error("Identity service error: {0}")]
    Upstream(String),
}
