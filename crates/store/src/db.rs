use cryptoiq_core::store::error::StoreError;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// 默认数据库文件名
const DEFAULT_DB_FILE: &str = "cryptoiq.db";

/// # Summary
/// 打开 (必要时创建) 数据目录下的 SQLite 数据库并初始化表结构。
///
/// # Logic
/// 1. 确保数据目录存在。
/// 2. 以 WAL 模式连接数据库，开启 `create_if_missing`。
/// 3. 执行 DDL 初始化 `profiles`、`portfolios`、`payments` 三张表。
///
/// # Arguments
/// * `data_dir` - 数据根目录。
///
/// # Returns
/// * 共享连接池或 `StoreError::InitError`。
pub async fn connect(data_dir: &Path) -> Result<SqlitePool, StoreError> {
    fs::create_dir_all(data_dir).map_err(|e| StoreError::InitError(e.to_string()))?;
    let db_path = data_dir.join(DEFAULT_DB_FILE);

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL COLLATE NOCASE,
            role TEXT NOT NULL DEFAULT 'free',
            created_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_profiles_email ON profiles (email);

        CREATE TABLE IF NOT EXISTS portfolios (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            coin TEXT NOT NULL,
            amount TEXT NOT NULL,
            buy_price TEXT NOT NULL,
            created_at DATETIME NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_portfolios_user ON portfolios (user_id);

        CREATE TABLE IF NOT EXISTS payments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            reference TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL,
            amount INTEGER NOT NULL,
            currency TEXT NOT NULL,
            channel TEXT NOT NULL,
            created_at DATETIME NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await
    .map_err(|e| StoreError::InitError(e.to_string()))?;

    info!("SQLite store ready at {}", db_path.display());
    Ok(pool)
}

/// 将 TEXT 列还原为 `Decimal`
pub(crate) fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw)
        .map_err(|e| StoreError::Corrupted(format!("{} = {:?}: {}", column, raw, e)))
}

pub(crate) fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}
