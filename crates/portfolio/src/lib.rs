//! # `cryptoiq-portfolio` - 收益计算与持仓估值
//!
//! - [`calculator`]：纯函数收益计算器。
//! - [`symbols`]：币种代码到行情 ID 的固定映射表。
//! - [`service`]：持仓增删改查 (写入校验、按用户隔离)。
//! - [`valuation`]：以实时报价为持仓估值并汇总。

pub mod calculator;
pub mod service;
pub mod symbols;
pub mod valuation;

use cryptoiq_core::market::error::MarketError;
use cryptoiq_core::store::error::StoreError;
use thiserror::Error;

/// # Summary
/// 持仓与估值服务的统一错误类型。
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("{0}")]
    Validation(String),
    #[error("Holding not found")]
    NotFound,
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("Price service error: {0}")]
    Upstream(#[from] MarketError),
    #[error("Arithmetic overflow")]
    Overflow,
}

impl From<StoreError> for PortfolioError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => PortfolioError::NotFound,
            other => PortfolioError::Store(other),
        }
    }
}
