use crate::db::{db_err, parse_decimal};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cryptoiq_core::store::error::StoreError;
use cryptoiq_core::store::port::{Holding, HoldingDraft, PortfolioStore};
use sqlx::SqlitePool;
use tracing::debug;

type HoldingRow = (String, String, String, String, String, DateTime<Utc>);

/// # Summary
/// `PortfolioStore` 的 SQLite 实现，管理 `portfolios` 表。
///
/// # Invariants
/// * 金额以 TEXT 保存，读取时无损还原为 `Decimal`。
/// * 所有写操作同时匹配 `id` 与 `user_id`，不会越权修改他人记录。
#[derive(Clone)]
pub struct SqlitePortfolioStore {
    pool: SqlitePool,
}

impl SqlitePortfolioStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_owned(&self, owner_id: &str, id: &str) -> Result<Option<Holding>, StoreError> {
        sqlx::query_as::<_, HoldingRow>(
            "SELECT id, user_id, coin, amount, buy_price, created_at FROM portfolios WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .map(into_holding)
        .transpose()
    }
}

fn into_holding(row: HoldingRow) -> Result<Holding, StoreError> {
    Ok(Holding {
        amount: parse_decimal("amount", &row.3)?,
        buy_price: parse_decimal("buy_price", &row.4)?,
        id: row.0,
        owner_id: row.1,
        coin: row.2,
        created_at: row.5,
    })
}

#[async_trait]
impl PortfolioStore for SqlitePortfolioStore {
    async fn list_holdings(&self, owner_id: &str) -> Result<Vec<Holding>, StoreError> {
        let rows = sqlx::query_as::<_, HoldingRow>(
            "SELECT id, user_id, coin, amount, buy_price, created_at FROM portfolios WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(into_holding).collect()
    }

    async fn insert_holding(
        &self,
        owner_id: &str,
        draft: &HoldingDraft,
    ) -> Result<Holding, StoreError> {
        let holding = Holding {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            coin: draft.coin.clone(),
            amount: draft.amount,
            buy_price: draft.buy_price,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO portfolios (id, user_id, coin, amount, buy_price, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&holding.id)
        .bind(&holding.owner_id)
        .bind(&holding.coin)
        .bind(holding.amount.to_string())
        .bind(holding.buy_price.to_string())
        .bind(holding.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        debug!("Inserted holding {} for user {}", holding.id, owner_id);
        Ok(holding)
    }

    async fn update_holding(
        &self,
        owner_id: &str,
        id: &str,
        draft: &HoldingDraft,
    ) -> Result<Holding, StoreError> {
        let result = sqlx::query(
            "UPDATE portfolios SET coin = ?, amount = ?, buy_price = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&draft.coin)
        .bind(draft.amount.to_string())
        .bind(draft.buy_price.to_string())
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.fetch_owned(owner_id, id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete_holding(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM portfolios WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
