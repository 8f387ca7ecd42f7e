//! # `cryptoiq-billing` - 付费权益流程
//!
//! - [`signature`]：webhook 请求体的 HMAC-SHA512 签名校验。
//! - [`service::EntitlementService`]：交易初始化、客户端核验与 webhook 处理，
//!   两条升级路径最终都落到 `PaymentStore::apply_premium_payment`，保证同一参考号至多升级一次。

pub mod service;
pub mod signature;
