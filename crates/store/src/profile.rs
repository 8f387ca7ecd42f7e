use crate::db::db_err;
use async_trait::async_trait;
use chrono::Utc;
use cryptoiq_core::common::Tier;
use cryptoiq_core::store::error::StoreError;
use cryptoiq_core::store::port::{Profile, ProfileStore};
use sqlx::SqlitePool;

/// # Summary
/// `ProfileStore` 的 SQLite 实现，管理 `profiles` 表。
///
/// # Invariants
/// * `role` 列只会写入 `Tier` 的小写形式。
#[derive(Clone)]
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn into_profile(row: (String, String, String)) -> Result<Profile, StoreError> {
    let role = row
        .2
        .parse::<Tier>()
        .map_err(StoreError::Corrupted)?;
    Ok(Profile {
        id: row.0,
        email: row.1,
        role,
    })
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        sqlx::query_as::<_, (String, String, String)>(
            "SELECT id, email, role FROM profiles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .map(into_profile)
        .transpose()
    }

    /// # Summary
    /// 根据邮箱反查档案。
    ///
    /// # Logic
    /// `email` 列声明为 `COLLATE NOCASE`，比较时忽略大小写。
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        sqlx::query_as::<_, (String, String, String)>(
            "SELECT id, email, role FROM profiles WHERE email = ? LIMIT 1",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .map(into_profile)
        .transpose()
    }

    /// # Summary
    /// 确保档案存在。
    ///
    /// # Logic
    /// 1. `INSERT ... ON CONFLICT(id) DO UPDATE` 只同步邮箱，保留已有等级。
    /// 2. 回读落库后的记录。
    async fn ensure_profile(&self, id: &str, email: &str) -> Result<Profile, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, role, created_at) VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET email = excluded.email
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(Tier::Free.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_profile(id).await?.ok_or(StoreError::NotFound)
    }
}
