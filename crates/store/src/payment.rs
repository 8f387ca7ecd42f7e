use crate::db::db_err;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cryptoiq_core::common::Tier;
use cryptoiq_core::store::error::StoreError;
use cryptoiq_core::store::port::{PaymentRecord, PaymentStore};
use sqlx::SqlitePool;
use tracing::info;

/// # Summary
/// `PaymentStore` 的 SQLite 实现，管理 `payments` 表并在同一事务内升级 `profiles.role`。
///
/// # Invariants
/// * `payments.reference` 带唯一约束，是权益升级的幂等键。
#[derive(Clone)]
pub struct SqlitePaymentStore {
    pool: SqlitePool,
}

impl SqlitePaymentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for SqlitePaymentStore {
    async fn get_payment(&self, reference: &str) -> Result<Option<PaymentRecord>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, i64, String, String, DateTime<Utc>)>(
            "SELECT reference, user_id, status, amount, currency, channel, created_at FROM payments WHERE reference = ?",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| PaymentRecord {
            reference: r.0,
            user_id: r.1,
            status: r.2,
            amount: r.3,
            currency: r.4,
            channel: r.5,
            created_at: r.6,
        }))
    }

    /// # Summary
    /// 记录支付并升级用户。
    ///
    /// # Logic
    /// 1. 开启事务，`INSERT OR IGNORE` 写入流水。
    /// 2. 未插入 (参考号已存在) 则直接提交并返回 `false`。
    /// 3. 将用户等级置为 premium；用户不存在时回滚并返回 `NotFound`。
    async fn apply_premium_payment(&self, record: &PaymentRecord) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO payments (user_id, reference, status, amount, currency, channel, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.reference)
        .bind(&record.status)
        .bind(record.amount)
        .bind(&record.currency)
        .bind(&record.channel)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?
        .rows_affected();

        if inserted == 0 {
            tx.commit().await.map_err(db_err)?;
            info!("Payment {} already recorded, skipping upgrade", record.reference);
            return Ok(false);
        }

        let upgraded = sqlx::query("UPDATE profiles SET role = ? WHERE id = ?")
            .bind(Tier::Premium.to_string())
            .bind(&record.user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        if upgraded == 0 {
            // 事务随 tx 析构自动回滚
            return Err(StoreError::NotFound);
        }

        tx.commit().await.map_err(db_err)?;
        info!(
            "Payment {} recorded, user {} upgraded to premium",
            record.reference, record.user_id
        );
        Ok(true)
    }
}
