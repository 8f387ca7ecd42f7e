use crate::market::entity::{NewsItem, PriceQuote};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 实时报价数据源接口。
///
/// # Invariants
/// - 一次调用对应一次批量上游请求。
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// # Summary
    /// 批量获取一组外部 ID 的美元价格。
    ///
    /// # Arguments
    /// * `coin_ids`: 已去重的外部行情 ID 列表。
    ///
    /// # Returns
    /// 返回上游实际给出报价的条目；未知 ID 不会出现在结果中。
    async fn fetch_usd_prices(&self, coin_ids: &[String]) -> Result<Vec<PriceQuote>, MarketError>;
}

/// # Summary
/// 新闻源接口。
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// 拉取上游 feed 并返回归一化条目 (保持 feed 原始顺序)。
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, MarketError>;
}
