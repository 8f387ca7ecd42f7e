use crate::signature;
use cryptoiq_core::common::Tier;
use cryptoiq_core::common::time::TimeProvider;
use cryptoiq_core::config::AppConfig;
use cryptoiq_core::payment::entity::{CheckoutRequest, CheckoutSession, Transaction, WebhookEvent};
use cryptoiq_core::payment::error::PaymentError;
use cryptoiq_core::payment::port::PaymentGateway;
use cryptoiq_core::store::error::StoreError;
use cryptoiq_core::store::port::{PaymentRecord, PaymentStore, Profile, ProfileStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 本系统生成的交易参考号前缀
const REFERENCE_PREFIX: &str = "cryptoiq_";

#[derive(Error, Debug)]
pub enum EntitlementError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid webhook signature")]
    InvalidSignature,
    #[error("Malformed webhook payload: {0}")]
    Payload(String),
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] PaymentError),
    #[error("Payment not successful (status: {0})")]
    NotSuccessful(String),
    #[error("Payment does not belong to this account")]
    OwnerMismatch,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// # Summary
/// 一次升级尝试的结果。除 `Upgraded` 外均不产生任何写入。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementOutcome {
    /// 新参考号已落库并完成升级
    Upgraded,
    /// 用户已是高级用户 (客户端核验路径的幂等短路)
    AlreadyPremium,
    /// 参考号此前已处理过
    DuplicateReference,
    /// webhook 中的付款邮箱找不到对应用户
    UnknownCustomer,
    /// 非成功扣款事件，确认接收但不处理
    Ignored,
}

impl EntitlementOutcome {
    pub fn message(self) -> &'static str {
        match self {
            EntitlementOutcome::Upgraded => "Account upgraded to premium",
            EntitlementOutcome::AlreadyPremium => "Account is already premium",
            EntitlementOutcome::DuplicateReference => "Payment already processed",
            EntitlementOutcome::UnknownCustomer => "No account matches this payment",
            EntitlementOutcome::Ignored => "Event ignored",
        }
    }
}

/// # Summary
/// 计费参数。
#[derive(Debug, Clone)]
pub struct BillingSettings {
    // 服务端密钥，同时用作 webhook 签名密钥
    pub secret_key: String,
    pub plan_amount: i64,
    pub currency: String,
    pub callback_url: String,
}

impl From<&AppConfig> for BillingSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            secret_key: config.payment.secret_key.clone(),
            plan_amount: config.payment.plan_amount,
            currency: config.payment.currency.clone(),
            callback_url: config.payment_callback_url(),
        }
    }
}

/// # Summary
/// 付费权益服务。
///
/// # Invariants
/// - webhook 与客户端核验两条路径都只通过 `apply_premium_payment` 升级，
///   同一参考号不会触发第二次升级。
/// - webhook 在签名校验通过前不解析请求体。
pub struct EntitlementService {
    gateway: Arc<dyn PaymentGateway>,
    profiles: Arc<dyn ProfileStore>,
    payments: Arc<dyn PaymentStore>,
    clock: Arc<dyn TimeProvider>,
    settings: BillingSettings,
}

impl EntitlementService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        profiles: Arc<dyn ProfileStore>,
        payments: Arc<dyn PaymentStore>,
        clock: Arc<dyn TimeProvider>,
        settings: BillingSettings,
    ) -> Self {
        if settings.secret_key.is_empty() {
            warn!("Payment secret key is empty; webhooks will be rejected");
        }
        Self {
            gateway,
            profiles,
            payments,
            clock,
            settings,
        }
    }

    /// # Summary
    /// 为调用方发起一笔高级版付款。
    ///
    /// # Logic
    /// 1. 生成唯一参考号 `cryptoiq_<uuid>`。
    /// 2. 以配置的金额、币种和回调地址调用服务商，metadata 中写入用户 ID。
    pub async fn initialize(&self, caller: &Profile) -> Result<CheckoutSession, EntitlementError> {
        if caller.email.trim().is_empty() {
            return Err(EntitlementError::Validation(
                "Account has no email address".to_string(),
            ));
        }

        let request = CheckoutRequest {
            email: caller.email.clone(),
            amount: self.settings.plan_amount,
            currency: self.settings.currency.clone(),
            reference: format!("{}{}", REFERENCE_PREFIX, Uuid::new_v4().simple()),
            callback_url: self.settings.callback_url.clone(),
            user_id: caller.id.clone(),
        };

        let session = self.gateway.initialize(&request).await?;
        info!(
            "Checkout {} initialized for {}",
            session.reference, caller.id
        );
        Ok(session)
    }

    /// # Summary
    /// 客户端在支付完成后提交参考号核验。
    ///
    /// # Logic
    /// 1. 参考号已入账时不再请求服务商：属于调用方则幂等返回，否则拒绝。
    /// 2. 向服务商核验交易，状态必须为成功。
    /// 3. metadata 中的用户 ID 必须与调用方一致，防止冒领他人付款。
    /// 4. 调用方已是高级用户时直接返回，不写库。
    /// 5. 否则记录流水并升级。
    pub async fn verify(
        &self,
        caller: &Profile,
        reference: &str,
    ) -> Result<EntitlementOutcome, EntitlementError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(EntitlementError::Validation(
                "reference is required".to_string(),
            ));
        }

        if let Some(record) = self.payments.get_payment(reference).await? {
            if record.user_id != caller.id {
                warn!(
                    "User {} tried to claim recorded payment {} owned by {}",
                    caller.id, reference, record.user_id
                );
                return Err(EntitlementError::OwnerMismatch);
            }
            return Ok(EntitlementOutcome::DuplicateReference);
        }

        let tx = self.gateway.verify(reference).await?;
        if !tx.is_successful() {
            return Err(EntitlementError::NotSuccessful(tx.status));
        }
        if tx.user_id.as_deref() != Some(caller.id.as_str()) {
            warn!(
                "User {} tried to claim payment {} owned by {:?}",
                caller.id, tx.reference, tx.user_id
            );
            return Err(EntitlementError::OwnerMismatch);
        }

        let role = self
            .profiles
            .get_profile(&caller.id)
            .await?
            .map_or(caller.role, |p| p.role);
        if role == Tier::Premium {
            return Ok(EntitlementOutcome::AlreadyPremium);
        }

        self.apply(&caller.id, &tx).await
    }

    /// # Summary
    /// 处理服务商推送的 webhook。
    ///
    /// # Logic
    /// 1. 使用原始字节校验 `x-paystack-signature`，失败直接拒绝。
    /// 2. 非 `charge.success` 事件或非成功交易确认后忽略。
    /// 3. 按付款邮箱反查用户，找不到时记录日志并正常返回。
    /// 4. 记录流水并升级。
    ///
    /// # Returns
    /// 仅签名错误、请求体错误和存储错误会返回 Err；其余情况都应向服务商回复 2xx。
    pub async fn handle_webhook(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<EntitlementOutcome, EntitlementError> {
        let signature = signature.unwrap_or_default();
        if !signature::verify(&self.settings.secret_key, body, signature) {
            warn!("Rejected webhook with invalid signature");
            return Err(EntitlementError::InvalidSignature);
        }

        let WebhookEvent { event, transaction } = self
            .gateway
            .parse_webhook(body)
            .map_err(|e| EntitlementError::Payload(e.to_string()))?;

        let Some(transaction) = transaction
            .filter(|tx| event == WebhookEvent::CHARGE_SUCCESS && tx.is_successful())
        else {
            info!("Ignoring webhook event {}", event);
            return Ok(EntitlementOutcome::Ignored);
        };

        let email = transaction.customer_email.as_deref().unwrap_or_default();
        let profile = if email.is_empty() {
            None
        } else {
            self.profiles.find_by_email(email).await?
        };
        let Some(profile) = profile else {
            warn!(
                "Webhook payment {} has no matching account (email: {:?})",
                transaction.reference, email
            );
            return Ok(EntitlementOutcome::UnknownCustomer);
        };

        self.apply(&profile.id, &transaction).await
    }

    async fn apply(
        &self,
        user_id: &str,
        tx: &Transaction,
    ) -> Result<EntitlementOutcome, EntitlementError> {
        let record = PaymentRecord {
            reference: tx.reference.clone(),
            user_id: user_id.to_string(),
            status: tx.status.clone(),
            amount: tx.amount,
            currency: tx.currency.clone(),
            channel: tx.channel.clone(),
            created_at: self.clock.now(),
        };

        match self.payments.apply_premium_payment(&record).await {
            Ok(true) => {
                info!("User {} upgraded to premium via {}", user_id, record.reference);
                Ok(EntitlementOutcome::Upgraded)
            }
            Ok(false) => {
                info!("Payment {} was already processed", record.reference);
                Ok(EntitlementOutcome::DuplicateReference)
            }
            Err(e) => {
                error!("Failed to record payment {}: {}", record.reference, e);
                Err(e.into())
            }
        }
    }
}
