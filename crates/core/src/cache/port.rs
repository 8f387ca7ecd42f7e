use crate::cache::error::CacheError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, de::DeserializeOwned};

/// # Summary
/// 缓存中的一条原始记录，携带写入时间以便上游自行判断新鲜度。
///
/// # Invariants
/// - `stored_at` 由缓存实现按其注入的时钟填写，调用方不可伪造。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub value: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

/// # Summary
/// 反序列化后的强类型缓存记录。
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> Cached<T> {
    /// 判断记录在 `now` 时刻是否仍处于 `ttl` 有效期内
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.stored_at < ttl
    }
}

/// # Summary
/// 业务无关的异步 KV 缓存接口 (Port)。
///
/// # Invariants
/// - 处理原始字节，确保 Trait 是对象安全的 (Object Safe)。
/// - 缓存本身不做过期淘汰：过期数据仍可读出，由业务层决定是否作为"旧数据"兜底。
#[async_trait]
pub trait Cache: Send + Sync {
    /// # Summary
    /// 写入原始字节，覆盖同名键并刷新写入时间。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    /// * `value`: 原始字节数组。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `CacheError`。
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;

    /// # Summary
    /// 读取原始记录 (含写入时间)。
    ///
    /// # Returns
    /// 存在则返回 `Some(CacheEntry)`，否则返回 `None`。
    async fn get_raw(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
}

/// # Summary
/// 缓存泛型扩展接口，提供 JSON 序列化支持。
///
/// # Invariants
/// - 自动为所有实现 `Cache` 的类型提供支持。
#[async_trait]
pub trait CacheExt: Cache {
    /// # Summary
    /// 存入强类型对象。
    ///
    /// # Logic
    /// 1. 使用 JSON 序列化对象。
    /// 2. 调用底层 `set_raw` 写入。
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value).map_err(|e| CacheError::Serialize(e.to_string()))?;
        self.set_raw(key, bytes).await
    }

    /// # Summary
    /// 取出强类型对象及其写入时间。
    ///
    /// # Logic
    /// 1. 调用底层 `get_raw` 获取记录。
    /// 2. 使用 JSON 反序列化为目标类型。
    async fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> Result<Option<Cached<T>>, CacheError> {
        match self.get_raw(key).await? {
            Some(entry) => {
                let value = serde_json::from_slice(&entry.value)
                    .map_err(|e| CacheError::Deserialize(e.to_string()))?;
                Ok(Some(Cached {
                    value,
                    stored_at: entry.stored_at,
                }))
            }
            None => Ok(None),
        }
    }
}

impl<T: Cache + ?Sized> CacheExt for T {}
