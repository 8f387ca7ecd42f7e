use cryptoiq_core::market::error::MarketError;
use cryptoiq_core::market::port::NewsFeed;
use cryptoiq_feed::syndication::RssNewsFeed;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Crypto Daily</title>
    <link>https://news.example.com</link>
    <description>Latest crypto headlines</description>
    <item>
      <title>Bitcoin hits new high</title>
      <link>https://news.example.com/btc</link>
      <pubDate>Sat, 17 Oct 2026 09:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Ether upgrade ships</title>
      <link>https://news.example.com/eth</link>
      <pubDate>Sat, 17 Oct 2026 08:00:00 GMT</pubDate>
      <source url="https://wire.example.com/rss">Chain Wire</source>
    </item>
    <item>
      <title>Item without link</title>
    </item>
  </channel>
</rss>"#;

#[tokio::test]
async fn test_fetch_and_normalize_feed() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(FEED),
        )
        .mount(&server)
        .await;

    let feed = RssNewsFeed::new(format!("{}/rss", server.uri()), Duration::from_secs(2))?;
    let items = feed.fetch_news().await?;

    // 缺少链接的条目被跳过，顺序保持 feed 原样
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Bitcoin hits new high");
    assert_eq!(items[0].source, "Crypto Daily");
    assert_eq!(items[0].published, "Sat, 17 Oct 2026 09:00:00 GMT");
    assert_eq!(items[1].source, "Chain Wire");
    Ok(())
}

#[tokio::test]
async fn test_malformed_feed_is_parse_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let feed = RssNewsFeed::new(server.uri(), Duration::from_secs(2))?;
    assert!(matches!(feed.fetch_news().await, Err(MarketError::Parse(_))));
    Ok(())
}
