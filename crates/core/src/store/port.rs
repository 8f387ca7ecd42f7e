use super::error::StoreError;
use crate::common::Tier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 用户档案实体，记录身份服务中的用户在本系统的权益等级。
///
/// # Invariants
/// - `id` 与身份服务返回的用户 ID 一致且全局唯一。
/// - `email` 用于在支付回调中反查用户。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    // 用户唯一标识 (身份服务颁发)
    pub id: String,
    // 邮箱
    pub email: String,
    // 权益等级
    pub role: Tier,
}

/// # Summary
/// 持仓实体，用户记录的一笔币种头寸。
///
/// # Invariants
/// - 写入时 `amount > 0` 且 `buy_price > 0`，读取时不再校验。
/// - `coin` 统一为大写代码 (如 `BTC`)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    // 记录 ID
    pub id: String,
    // 所属用户
    pub owner_id: String,
    // 币种代码
    pub coin: String,
    // 持有数量
    pub amount: Decimal,
    // 买入单价 (USD)
    pub buy_price: Decimal,
    // 创建时间
    pub created_at: DateTime<Utc>,
}

/// # Summary
/// 新建或整体更新持仓时的字段集合。
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingDraft {
    pub coin: String,
    pub amount: Decimal,
    pub buy_price: Decimal,
}

/// # Summary
/// 支付流水，同一 `reference` 至多落库一次，作为权益升级的幂等凭据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    // 支付服务商交易参考号 (唯一)
    pub reference: String,
    // 付款用户
    pub user_id: String,
    // 服务商返回的交易状态
    pub status: String,
    // 金额 (货币最小单位)
    pub amount: i64,
    // 币种
    pub currency: String,
    // 支付渠道 (card / bank 等)
    pub channel: String,
    // 落库时间
    pub created_at: DateTime<Utc>,
}

/// # Summary
/// 用户档案存储接口，负责 `profiles` 表的读写。
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// # Summary
    /// 根据用户 ID 获取档案。
    ///
    /// # Returns
    /// 存在返回 `Some(Profile)`，否则返回 `None`。
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// # Summary
    /// 根据邮箱反查档案 (大小写不敏感)。
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError>;

    /// # Summary
    /// 确保档案存在。
    ///
    /// # Logic
    /// 1. 不存在时以 `free` 等级插入。
    /// 2. 已存在时只同步邮箱，不改动等级。
    ///
    /// # Returns
    /// 返回落库后的档案。
    async fn ensure_profile(&self, id: &str, email: &str) -> Result<Profile, StoreError>;
}

/// # Summary
/// 持仓存储接口，所有操作都以 `owner_id` 限定作用域。
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// 列出用户的全部持仓 (按创建时间倒序)。
    async fn list_holdings(&self, owner_id: &str) -> Result<Vec<Holding>, StoreError>;

    /// 新增一笔持仓并返回完整记录。
    async fn insert_holding(
        &self,
        owner_id: &str,
        draft: &HoldingDraft,
    ) -> Result<Holding, StoreError>;

    /// # Summary
    /// 整体覆盖一笔持仓。
    ///
    /// # Returns
    /// 记录不存在或不属于该用户时返回 `StoreError::NotFound`。
    async fn update_holding(
        &self,
        owner_id: &str,
        id: &str,
        draft: &HoldingDraft,
    ) -> Result<Holding, StoreError>;

    /// # Summary
    /// 删除一笔持仓。
    ///
    /// # Returns
    /// 记录不存在或不属于该用户时返回 `StoreError::NotFound`。
    async fn delete_holding(&self, owner_id: &str, id: &str) -> Result<(), StoreError>;
}

/// # Summary
/// 支付流水存储接口。
///
/// # Invariants
/// - 同一 `reference` 只能触发一次权益升级。
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// 按参考号查询流水。
    async fn get_payment(&self, reference: &str) -> Result<Option<PaymentRecord>, StoreError>;

    /// # Summary
    /// 记录一笔成功支付并将付款用户升级为 premium。
    ///
    /// # Logic
    /// 1. 在同一事务内按 `reference` 插入流水，已存在则忽略。
    /// 2. 仅当本次确实插入了新流水时，才把 `user_id` 的等级置为 premium。
    ///
    /// # Returns
    /// 新流水返回 `true`；参考号已处理过返回 `false` (不产生任何写入)。
    async fn apply_premium_payment(&self, record: &PaymentRecord) -> Result<bool, StoreError>;
}
