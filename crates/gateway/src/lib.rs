//! # `cryptoiq-gateway` - 第三方账户服务适配器
//!
//! - [`supabase::SupabaseIdentity`]：`IdentityProvider` 实现，通过 Supabase Auth 校验 Bearer 凭证。
//! - [`paystack::PaystackGateway`]：`PaymentGateway` 实现，负责交易初始化与核验，
//!   同时提供 webhook 请求体解析 [`paystack::parse_webhook`]。

pub mod paystack;
pub mod supabase;

use cryptoiq_core::common::tls::ensure_crypto_provider;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    ensure_crypto_provider();
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cryptoiq/", env!("CARGO_PKG_VERSION")))
        .build()
}
