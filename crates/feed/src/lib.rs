//! # `cryptoiq-feed` - 行情与新闻上游适配器
//!
//! - [`coingecko::CoinGeckoProvider`]：`PriceProvider` 实现，批量拉取美元报价。
//! - [`syndication::RssNewsFeed`]：`NewsFeed` 实现，拉取并归一化 RSS 2.0 新闻。
//!
//! 所有客户端都带显式超时，超时按普通拉取失败处理。

pub mod coingecko;
pub mod syndication;

use cryptoiq_core::common::tls::ensure_crypto_provider;
use cryptoiq_core::market::error::MarketError;
use std::time::Duration;

/// 构建带超时与统一 User-Agent 的 HTTP 客户端
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, MarketError> {
    ensure_crypto_provider();
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cryptoiq/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| MarketError::Client(e.to_string()))
}
