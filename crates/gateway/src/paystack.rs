use async_trait::async_trait;
use cryptoiq_core::payment::entity::{CheckoutRequest, CheckoutSession, Transaction, WebhookEvent};
use cryptoiq_core::payment::error::PaymentError;
use cryptoiq_core::payment::port::PaymentGateway;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// # Summary
/// Paystack 支付网关实现。
///
/// # Invariants
/// - 所有请求使用服务端密钥作为 Bearer 凭证。
/// - `status=false` 的响应一律映射为 `PaymentError::Rejected`。
#[derive(Clone)]
pub struct PaystackGateway {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl PaystackGateway {
    pub fn new(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let client =
            crate::build_client(timeout).map_err(|e| PaymentError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }
}

/// Paystack 统一响应外壳
#[derive(Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Deserialize)]
struct InitializeData {
    authorization_url: String,
    reference: String,
}

/// verify 接口与 webhook 共用的交易数据结构
#[derive(Deserialize)]
struct TransactionData {
    reference: String,
    status: String,
    #[serde(default)]
    amount: i64,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
    #[serde(default)]
    customer: Option<Customer>,
}

#[derive(Deserialize)]
struct Customer {
    email: Option<String>,
}

/// webhook 外壳，`data` 的结构随事件类型变化
#[derive(Deserialize)]
struct WebhookBody {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl From<TransactionData> for Transaction {
    fn from(data: TransactionData) -> Self {
        // metadata 可能是对象，也可能是空串
        let user_id = data
            .metadata
            .as_ref()
            .and_then(|m| m.get("user_id"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .filter(|s| !s.is_empty());

        Transaction {
            reference: data.reference,
            status: data.status,
            amount: data.amount,
            currency: data.currency,
            channel: data.channel.unwrap_or_default(),
            user_id,
            customer_email: data.customer.and_then(|c| c.email),
        }
    }
}

/// # Summary
/// 解析 webhook 请求体。调用方需先完成签名校验。
///
/// # Logic
/// 1. 先只解析 `{event, data}` 外壳。
/// 2. 仅 `charge.success` 将 `data` 解码为交易，其他事件原样忽略 `data`。
pub fn parse_webhook(body: &[u8]) -> Result<WebhookEvent, PaymentError> {
    let parsed: WebhookBody =
        serde_json::from_slice(body).map_err(|e| PaymentError::Parse(e.to_string()))?;

    let transaction = if parsed.event == WebhookEvent::CHARGE_SUCCESS {
        let data: TransactionData =
            serde_json::from_value(parsed.data).map_err(|e| PaymentError::Parse(e.to_string()))?;
        Some(data.into())
    } else {
        None
    };

    Ok(WebhookEvent {
        event: parsed.event,
        transaction,
    })
}

async fn read_envelope<T: DeserializeOwned>(resp: Response) -> Result<T, PaymentError> {
    let status = resp.status();
    let envelope: Envelope<T> = match resp.json().await {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(PaymentError::Parse(e.to_string())),
        Err(_) => return Err(PaymentError::Rejected(format!("status {}", status.as_u16()))),
    };

    if !status.is_success() || !envelope.status {
        warn!("Paystack rejected request ({}): {}", status, envelope.message);
        return Err(PaymentError::Rejected(envelope.message));
    }

    envelope
        .data
        .ok_or_else(|| PaymentError::Parse("missing data".to_string()))
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    /// # Summary
    /// 调用 `POST /transaction/initialize` 创建交易。
    ///
    /// # Logic
    /// 用户 ID 写入 `metadata.user_id`，供 verify 与 webhook 回查归属。
    async fn initialize(&self, request: &CheckoutRequest) -> Result<CheckoutSession, PaymentError> {
        let body = json!({
            "email": request.email,
            "amount": request.amount,
            "currency": request.currency,
            "reference": request.reference,
            "callback_url": request.callback_url,
            "metadata": { "user_id": request.user_id },
        });

        let resp = self
            .client
            .post(format!("{}/transaction/initialize", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let data: InitializeData = read_envelope(resp).await?;
        debug!("Paystack transaction initialized: {}", data.reference);
        Ok(CheckoutSession {
            authorization_url: data.authorization_url,
            reference: data.reference,
        })
    }

    async fn verify(&self, reference: &str) -> Result<Transaction, PaymentError> {
        let resp = self
            .client
            .get(format!("{}/transaction/verify/{}", self.base_url, reference))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let data: TransactionData = read_envelope(resp).await?;
        Ok(data.into())
    }

    fn parse_webhook(&self, body: &[u8]) -> Result<WebhookEvent, PaymentError> {
        parse_webhook(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_webhook_extracts_owner_and_email() {
        let body = br#"{
            "event": "charge.success",
            "data": {
                "reference": "cryptoiq_1",
                "status": "success",
                "amount": 500000,
                "currency": "NGN",
                "channel": "card",
                "metadata": { "user_id": "u-1" },
                "customer": { "email": "a@b.com" }
            }
        }"#;
        let event = parse_webhook(body).unwrap();
        assert_eq!(event.event, WebhookEvent::CHARGE_SUCCESS);
        let tx = event.transaction.unwrap();
        assert_eq!(tx.user_id.as_deref(), Some("u-1"));
        assert_eq!(tx.customer_email.as_deref(), Some("a@b.com"));
        assert!(tx.is_successful());
    }

    #[test]
    fn test_parse_webhook_tolerates_empty_metadata() {
        let body = br#"{"event":"charge.success","data":{"reference":"r","status":"success","metadata":""}}"#;
        let tx = parse_webhook(body).unwrap().transaction.unwrap();
        assert_eq!(tx.user_id, None);
        assert_eq!(tx.channel, "");
    }

    #[test]
    fn test_parse_webhook_skips_data_of_other_events() {
        let bodies: [&[u8]; 3] = [
            br#"{"event":"subscription.create","data":{"status":"active","subscription_code":"SUB_1","customer":{"email":"a@b.com"}}}"#,
            br#"{"event":"customeridentification.success","data":{"customer_id":"82796315","email":"a@b.com","identification":{"country":"NG","type":"bank_account"}}}"#,
            br#"{"event":"paymentrequest.pending"}"#,
        ];
        for body in bodies {
            let event = parse_webhook(body).unwrap();
            assert_ne!(event.event, WebhookEvent::CHARGE_SUCCESS);
            assert_eq!(event.transaction, None);
        }
    }

    #[test]
    fn test_parse_webhook_requires_reference_on_charge() {
        let body = br#"{"event":"charge.success","data":{"status":"success"}}"#;
        assert!(matches!(parse_webhook(body), Err(PaymentError::Parse(_))));
    }

    #[test]
    fn test_parse_webhook_rejects_garbage() {
        assert!(matches!(parse_webhook(b"not json"), Err(PaymentError::Parse(_))));
    }
}
