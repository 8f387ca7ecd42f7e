use serde::{Deserialize, Serialize};

/// # Summary
/// 发起支付所需的参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub email: String,
    // 金额 (货币最小单位)
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    pub callback_url: String,
    // 回写到交易 metadata 的本系统用户 ID
    pub user_id: String,
}

/// # Summary
/// 服务商返回的支付会话。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub authorization_url: String,
    pub reference: String,
}

/// # Summary
/// 服务商对一笔交易的核验结果 (verify 接口或 webhook 事件)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub reference: String,
    // 服务商状态，成功为 `success`
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub channel: String,
    // 发起支付时写入 metadata 的用户 ID
    pub user_id: Option<String>,
    pub customer_email: Option<String>,
}

impl Transaction {
    /// 服务商判定交易成功的状态值
    pub const SUCCESS: &'static str = "success";

    pub fn is_successful(&self) -> bool {
        self.status.eq_ignore_ascii_case(Self::SUCCESS)
    }
}

/// # Summary
/// 经过签名校验的 webhook 事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    // 事件类型，例如 `charge.success`
    pub event: String,
    /// 仅扣款成功事件携带交易；订阅、身份核验等其他事件的 data 结构各异，不做解析
    pub transaction: Option<Transaction>,
}

impl WebhookEvent {
    pub const CHARGE_SUCCESS: &'static str = "charge.success";
}
