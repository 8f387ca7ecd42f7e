use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单个币种的实时美元报价，按次拉取，不落库。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    // 外部行情 ID (例如 CoinGecko 的 `bitcoin`)
    pub coin_id: String,
    // 美元价格
    pub usd_price: Decimal,
}

/// # Summary
/// 归一化后的新闻条目。
///
/// # Invariants
/// - 顺序由上游 feed 决定 (通常为最新在前)，聚合器不重新排序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    // 标题
    pub title: String,
    // 原文链接
    pub link: String,
    // 发布时间 (保留上游原始格式)
    pub published: String,
    // 来源名称
    pub source: String,
}
