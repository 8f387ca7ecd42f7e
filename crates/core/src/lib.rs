//! # `cryptoiq-core` - 领域模型与端口定义
//!
//! 本 crate 只包含实体、错误枚举与 `async_trait` 端口 (Port)，不包含任何 I/O 实现。
//! 具体适配器 (SQLite、CoinGecko、Paystack、Supabase) 位于各自的基础设施 crate 中，
//! 由 `cryptoiq-app` 在启动时以 `Arc<dyn Trait>` 的形式注入。

pub mod common;
pub mod config;

pub mod cache {
    pub mod error;
    pub mod port;
}

pub mod store {
    pub mod error;
    pub mod port;
}

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod identity {
    pub mod error;
    pub mod port;
}

pub mod payment {
    pub mod entity;
    pub mod error;
    pub mod port;
}
