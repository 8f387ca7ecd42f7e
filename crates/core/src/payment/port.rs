use crate::payment::entity::{CheckoutRequest, CheckoutSession, Transaction, WebhookEvent};
use crate::payment::error::PaymentError;
use async_trait::async_trait;

/// # Summary
/// 支付服务商接口 (交易初始化与核验)。
///
/// # Invariants
/// - 不负责 webhook 签名校验，签名逻辑属于计费服务；`parse_webhook` 只应作用于已验签的请求体。
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 初始化一笔交易并返回跳转地址。
    async fn initialize(&self, request: &CheckoutRequest) -> Result<CheckoutSession, PaymentError>;

    /// 按参考号向服务商核验交易。
    async fn verify(&self, reference: &str) -> Result<Transaction, PaymentError>;

    /// 解析服务商推送的 webhook 请求体。
    fn parse_webhook(&self, body: &[u8]) -> Result<WebhookEvent, PaymentError>;
}
