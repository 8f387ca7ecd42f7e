use chrono::Duration;
use cryptoiq_core::cache::port::{Cache, CacheExt, Cached};
use cryptoiq_core::common::Tier;
use cryptoiq_core::common::time::TimeProvider;
use cryptoiq_core::config::{MarketConfig, NewsFailurePolicy};
use cryptoiq_core::market::entity::NewsItem;
use cryptoiq_core::market::error::MarketError;
use cryptoiq_core::market::port::NewsFeed;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// 新闻快照在缓存中的键
const SNAPSHOT_KEY: &str = "news:snapshot";

#[derive(Error, Debug)]
pub enum NewsError {
    /// 上游失败且没有任何旧快照可用 (仅在 `NewsFailurePolicy::Error` 下出现)
    #[error("News feed unavailable: {0}")]
    Upstream(#[from] MarketError),
}

/// # Summary
/// 聚合器运行参数。
#[derive(Debug, Clone)]
pub struct NewsSettings {
    pub ttl: Duration,
    // 每次刷新保留的条数，同时是高级用户可见的上限
    pub fetch_limit: usize,
    pub free_limit: usize,
    pub failure: NewsFailurePolicy,
}

impl From<&MarketConfig> for NewsSettings {
    fn from(config: &MarketConfig) -> Self {
        Self {
            ttl: i64::try_from(config.news_ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            fetch_limit: config.news_fetch_limit,
            free_limit: config.free_news_limit,
            failure: config.news_failure,
        }
    }
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self::from(&MarketConfig::default())
    }
}

/// # Summary
/// 新闻聚合器：进程内唯一实例，由启动流程构造后注入 HTTP 状态。
///
/// # Invariants
/// - 缓存中永远是最近一次成功拉取的结果，拉取失败不会清空或覆盖它。
/// - 同一缓存键同一时刻至多一个上游请求在途，其余调用方等待并复用结果。
/// - 条目顺序与上游 feed 一致。
pub struct NewsAggregator {
    feed: Arc<dyn NewsFeed>,
    cache: Arc<dyn Cache>,
    clock: Arc<dyn TimeProvider>,
    settings: NewsSettings,
    // 每个缓存键一把刷新锁
    refresh_guards: DashMap<String, Arc<Mutex<()>>>,
}

impl NewsAggregator {
    pub fn new(
        feed: Arc<dyn NewsFeed>,
        cache: Arc<dyn Cache>,
        clock: Arc<dyn TimeProvider>,
        settings: NewsSettings,
    ) -> Self {
        Self {
            feed,
            cache,
            clock,
            settings,
            refresh_guards: DashMap::new(),
        }
    }

    /// # Summary
    /// 按用户等级返回新闻列表。
    ///
    /// # Arguments
    /// * `tier`: 已解析的调用方等级，免费用户最多拿到 `free_limit` 条。
    pub async fn latest(&self, tier: Tier) -> Result<Vec<NewsItem>, NewsError> {
        let mut items = self.snapshot().await?;
        let limit = if tier.is_premium() {
            self.settings.fetch_limit
        } else {
            self.settings.free_limit.min(self.settings.fetch_limit)
        };
        items.truncate(limit);
        Ok(items)
    }

    /// # Summary
    /// 获取完整快照，必要时刷新。
    ///
    /// # Logic
    /// 1. 快照非空且未过期，直接返回。
    /// 2. 获取该键的刷新锁，再次检查 (可能已被其他调用方刷新)。
    /// 3. 拉取上游，截取前 `fetch_limit` 条后整体替换缓存。
    /// 4. 拉取失败时保留缓存：有旧快照则返回旧快照，否则按失败策略处理。
    pub async fn snapshot(&self) -> Result<Vec<NewsItem>, NewsError> {
        if let Some(cached) = self.fresh_snapshot().await {
            debug!("News cache hit ({} items)", cached.len());
            return Ok(cached);
        }

        let guard = self
            .refresh_guards
            .entry(SNAPSHOT_KEY.to_string())
            .or_default()
            .clone();
        let _refresh = guard.lock().await;

        let stale = self.read_cache().await;
        if let Some(cached) = stale.as_ref().filter(|c| self.is_fresh(c)) {
            debug!("News refreshed by a concurrent caller");
            return Ok(cached.value.clone());
        }

        match self.feed.fetch_news().await {
            Ok(mut items) => {
                items.truncate(self.settings.fetch_limit);
                if let Err(e) = self.cache.set(SNAPSHOT_KEY, &items).await {
                    warn!("Failed to store news snapshot: {}", e);
                }
                info!("News snapshot refreshed with {} items", items.len());
                Ok(items)
            }
            Err(e) => {
                warn!("News fetch failed: {}", e);
                match stale {
                    Some(cached) => Ok(cached.value),
                    None => match self.settings.failure {
                        NewsFailurePolicy::Empty => Ok(Vec::new()),
                        NewsFailurePolicy::Error => Err(NewsError::Upstream(e)),
                    },
                }
            }
        }
    }

    async fn fresh_snapshot(&self) -> Option<Vec<NewsItem>> {
        self.read_cache()
            .await
            .filter(|cached| self.is_fresh(cached))
            .map(|cached| cached.value)
    }

    // 空快照视为未命中
    fn is_fresh(&self, cached: &Cached<Vec<NewsItem>>) -> bool {
        !cached.value.is_empty() && cached.is_fresh(self.clock.now(), self.settings.ttl)
    }

    async fn read_cache(&self) -> Option<Cached<Vec<NewsItem>>> {
        match self.cache.get::<Vec<NewsItem>>(SNAPSHOT_KEY).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Unreadable news snapshot ignored: {}", e);
                None
            }
        }
    }
}
