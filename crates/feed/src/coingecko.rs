use async_trait::async_trait;
use cryptoiq_core::market::entity::PriceQuote;
use cryptoiq_core::market::error::MarketError;
use cryptoiq_core::market::port::PriceProvider;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// CoinGecko 报价提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端，所有请求受构造时给定的超时约束。
/// - `base_url` 指向 API 根路径 (例如 `https://api.coingecko.com/api/v3`)。
#[derive(Clone)]
pub struct CoinGeckoProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// # Summary
    /// 创建一个新的 CoinGeckoProvider 实例。
    ///
    /// # Arguments
    /// * `base_url`: API 根路径。
    /// * `timeout`: 单次请求的最长等待时间。
    ///
    /// # Returns
    /// 客户端构建失败时返回 `MarketError::Client`。
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketError> {
        Ok(Self {
            client: crate::build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// # Summary
/// `simple/price` 接口中单个币种的报价。
#[derive(Deserialize, Debug)]
struct SimplePrice {
    usd: Option<Decimal>,
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    /// # Summary
    /// 批量拉取美元报价。
    ///
    /// # Logic
    /// 1. ID 列表为空时不发起请求。
    /// 2. 以逗号拼接 ID 调用 `simple/price?vs_currencies=usd`。
    /// 3. 丢弃上游未给出 `usd` 字段的条目。
    async fn fetch_usd_prices(&self, coin_ids: &[String]) -> Result<Vec<PriceQuote>, MarketError> {
        if coin_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/simple/price", self.base_url);
        let ids = coin_ids.join(",");

        let resp = self
            .client
            .get(&url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Status(resp.status().as_u16()));
        }

        let json: HashMap<String, SimplePrice> = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let quotes: Vec<PriceQuote> = json
            .into_iter()
            .filter_map(|(coin_id, price)| {
                price.usd.map(|usd_price| PriceQuote { coin_id, usd_price })
            })
            .collect();

        debug!("CoinGecko returned {} quotes for [{}]", quotes.len(), ids);
        Ok(quotes)
    }
}
