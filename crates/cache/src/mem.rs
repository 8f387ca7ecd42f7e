use async_trait::async_trait;
use cryptoiq_core::cache::error::CacheError;
use cryptoiq_core::cache::port::{Cache, CacheEntry};
use cryptoiq_core::common::time::{RealTimeProvider, TimeProvider};
use dashmap::DashMap;
use std::sync::Arc;

/// # Summary
/// 基于 DashMap 的内存缓存实现。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 写入时间取自注入的 `TimeProvider`，不做自动过期或容量限制。
pub struct MemCache {
    // 线程安全的 KV 存储容器
    storage: DashMap<String, CacheEntry>,
    // 写入时间来源
    clock: Arc<dyn TimeProvider>,
}

impl MemCache {
    /// # Summary
    /// 使用真实系统时钟创建缓存。
    pub fn new() -> Self {
        Self::with_clock(Arc::new(RealTimeProvider))
    }

    /// # Summary
    /// 使用指定时钟创建缓存，测试中可注入 `FakeClockProvider`。
    pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }
}

impl Default for MemCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemCache {
    /// # Summary
    /// 写入原始字节数据。
    ///
    /// # Logic
    /// 以当前时钟时间封装为 `CacheEntry` 后插入哈希表，同名 Key 整体覆盖。
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.storage.insert(key.to_string(), entry);
        Ok(())
    }

    /// # Summary
    /// 读取原始记录。
    ///
    /// # Logic
    /// 克隆出独立所有权的记录返回，不持有分片锁。
    async fn get_raw(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.storage.get(key).map(|v| v.value().clone()))
    }
}
