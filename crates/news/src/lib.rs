//! # `cryptoiq-news` - 新闻聚合服务
//!
//! 在 `NewsFeed` 端口之上提供带 TTL 的共享快照、单飞刷新 (single-flight) 与按等级截取。

pub mod aggregator;
