use chrono::{Duration, TimeZone, Utc};
use cryptoiq_cache::mem::MemCache;
use cryptoiq_core::cache::port::{Cache, CacheExt};
use cryptoiq_core::common::time::{FakeClockProvider, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Headline {
    title: String,
    link: String,
}

#[tokio::test]
async fn test_mem_cache_raw_ops() {
    let cache = MemCache::new();
    let key = "raw_key";
    let value = vec![1, 2, 3, 4];

    assert!(cache.get_raw(key).await.unwrap().is_none());

    // 测试存取
    cache.set_raw(key, value.clone()).await.unwrap();
    let entry = cache.get_raw(key).await.unwrap().unwrap();
    assert_eq!(entry.value, value);

    // 同名 Key 整体覆盖
    cache.set_raw(key, vec![9]).await.unwrap();
    assert_eq!(cache.get_raw(key).await.unwrap().unwrap().value, vec![9]);
}

#[tokio::test]
async fn test_mem_cache_typed_ops_keep_stored_at() {
    let start = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
    let clock = Arc::new(FakeClockProvider::new(start));
    let cache = MemCache::with_clock(clock.clone());

    let items = vec![Headline {
        title: "BTC breaks out".to_string(),
        link: "https://example.com/btc".to_string(),
    }];
    cache.set("news", &items).await.unwrap();

    // 时间推进后读取，写入时间保持不变，由调用方判断是否过期
    clock.advance(Duration::minutes(45));
    let cached = cache.get::<Vec<Headline>>("news").await.unwrap().unwrap();
    assert_eq!(cached.value, items);
    assert_eq!(cached.stored_at, start);
    assert!(!cached.is_fresh(clock.now(), Duration::minutes(30)));

    // 覆盖写入刷新写入时间
    cache.set("news", &items).await.unwrap();
    let cached = cache.get::<Vec<Headline>>("news").await.unwrap().unwrap();
    assert_eq!(cached.stored_at, start + Duration::minutes(45));
}

#[tokio::test]
async fn test_mem_cache_typed_get_rejects_foreign_bytes() {
    let cache = MemCache::new();
    cache.set_raw("news", b"not json".to_vec()).await.unwrap();
    assert!(cache.get::<Vec<Headline>>("news").await.is_err());
}
