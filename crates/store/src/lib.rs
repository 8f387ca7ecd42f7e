//! # `cryptoiq-store` - SQLite 持久化适配器
//!
//! 为 `cryptoiq-core` 中的 `ProfileStore`、`PortfolioStore`、`PaymentStore` 提供
//! 基于 `sqlx` 的 SQLite 实现。三个存储共享同一个连接池，
//! 以便支付落库与等级升级在同一事务内完成。

pub mod db;
pub mod payment;
pub mod portfolio;
pub mod profile;
