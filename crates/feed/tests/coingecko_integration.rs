use cryptoiq_core::market::error::MarketError;
use cryptoiq_core::market::port::PriceProvider;
use cryptoiq_feed::coingecko::CoinGeckoProvider;
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// # Summary
/// 批量报价：一次请求拿到多个币种，缺少 usd 字段的条目被丢弃。
#[tokio::test]
async fn test_fetch_prices_in_one_batch() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .and(query_param("ids", "bitcoin,ethereum,ghost"))
        .and(query_param("vs_currencies", "usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bitcoin": { "usd": 64000.5 },
            "ethereum": { "usd": 150 },
            "ghost": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = CoinGeckoProvider::new(server.uri(), Duration::from_secs(2))?;
    let ids = vec![
        "bitcoin".to_string(),
        "ethereum".to_string(),
        "ghost".to_string(),
    ];
    let mut quotes = provider.fetch_usd_prices(&ids).await?;
    quotes.sort_by(|a, b| a.coin_id.cmp(&b.coin_id));

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].coin_id, "bitcoin");
    assert_eq!(quotes[0].usd_price, dec!(64000.5));
    assert_eq!(quotes[1].usd_price, dec!(150));
    Ok(())
}

#[tokio::test]
async fn test_empty_id_list_skips_request() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = CoinGeckoProvider::new(server.uri(), Duration::from_secs(2))?;
    assert!(provider.fetch_usd_prices(&[]).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_upstream_error_status() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = CoinGeckoProvider::new(server.uri(), Duration::from_secs(2))?;
    let result = provider.fetch_usd_prices(&["bitcoin".to_string()]).await;
    assert!(matches!(result, Err(MarketError::Status(429))));
    Ok(())
}

/// # Summary
/// 超时视为普通的网络失败，而不是挂起或 panic。
#[tokio::test]
async fn test_slow_upstream_times_out() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/simple/price"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "bitcoin": { "usd": 1 } }))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let provider = CoinGeckoProvider::new(server.uri(), Duration::from_millis(100))?;
    let result = provider.fetch_usd_prices(&["bitcoin".to_string()]).await;
    assert!(matches!(result, Err(MarketError::Network(_))));
    Ok(())
}
