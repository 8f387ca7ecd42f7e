use async_trait::async_trait;
use cryptoiq_core::market::entity::NewsItem;
use cryptoiq_core::market::error::MarketError;
use cryptoiq_core::market::port::NewsFeed;
use reqwest::Client;
use rss::Channel;
use std::time::Duration;

/// # Summary
/// RSS 2.0 新闻源实现。
///
/// # Invariants
/// - 保持 feed 中的条目顺序。
/// - 缺少标题或链接的条目会被跳过。
#[derive(Clone)]
pub struct RssNewsFeed {
    client: Client,
    feed_url: String,
}

impl RssNewsFeed {
    pub fn new(feed_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketError> {
        Ok(Self {
            client: crate::build_client(timeout)?,
            feed_url: feed_url.into(),
        })
    }
}

/// # Summary
/// 将 RSS 频道归一化为新闻条目。
///
/// # Logic
/// 1. 条目自带 `<source>` 时以其名称作为来源，否则使用频道标题。
/// 2. 发布时间原样保留，缺失时为空串。
pub fn normalize_channel(channel: &Channel) -> Vec<NewsItem> {
    let channel_title = channel.title().trim();

    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.trim();
            let link = item.link()?.trim();
            if title.is_empty() || link.is_empty() {
                return None;
            }
            let source = item
                .source()
                .and_then(|s| s.title())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(channel_title);

            Some(NewsItem {
                title: title.to_string(),
                link: link.to_string(),
                published: item.pub_date().unwrap_or_default().trim().to_string(),
                source: source.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl NewsFeed for RssNewsFeed {
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, MarketError> {
        let resp = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Status(resp.status().as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let channel = Channel::read_from(&body[..]).map_err(|e| MarketError::Parse(e.to_string()))?;
        Ok(normalize_channel(&channel))
    }
}
