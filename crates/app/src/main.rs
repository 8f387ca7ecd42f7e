mod logging;
mod settings;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cryptoiq_api::server::{AppState, start_server};
use cryptoiq_billing::service::{BillingSettings, EntitlementService};
use cryptoiq_cache::mem::MemCache;
use cryptoiq_core::common::time::RealTimeProvider;
use cryptoiq_core::common::tls::ensure_crypto_provider;
use cryptoiq_feed::coingecko::CoinGeckoProvider;
use cryptoiq_feed::syndication::RssNewsFeed;
use cryptoiq_gateway::paystack::PaystackGateway;
use cryptoiq_gateway::supabase::SupabaseIdentity;
use cryptoiq_news::aggregator::{NewsAggregator, NewsSettings};
use cryptoiq_portfolio::service::HoldingService;
use cryptoiq_portfolio::valuation::ValuationEngine;
use cryptoiq_store::db;
use cryptoiq_store::payment::SqlitePaymentStore;
use cryptoiq_store::portfolio::SqlitePortfolioStore;
use cryptoiq_store::profile::SqliteProfileStore;
use tracing::{info, warn};

/// 默认配置文件 (可省略扩展名)，可由 `CRYPTOIQ_CONFIG` 指定
const DEFAULT_CONFIG_FILE: &str = "config";

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现并以 `Arc<dyn Trait>` 注入到各服务与 API 层。
///
/// # Logic
/// 1. 读取 `.env` 并分层加载配置。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层 (SQLite、缓存、行情、新闻、身份、支付)。
/// 4. 构造应用服务层 (新闻聚合、持仓、估值、付费权益)。
/// 5. 启动 HTTP 服务，直到收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ensure_crypto_provider();

    // 1. 配置
    let dotenv = dotenvy::dotenv();
    let vars: HashMap<String, String> = std::env::vars().collect();
    let config_file = vars
        .get("CRYPTOIQ_CONFIG")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_FILE);
    let config = settings::load(config_file, &vars)?;

    // 2. 日志
    let _log_guard = logging::init(&config.log)?;
    info!("CryptoIQ backend starting...");
    if dotenv.is_err() {
        info!("No .env file loaded, using process environment");
    }
    if config.identity.service_key.is_empty() {
        warn!("identity.service_key is empty, token verification will fail");
    }
    if config.payment.secret_key.is_empty() {
        warn!("payment.secret_key is empty, payments and webhooks are disabled");
    }

    // 3. 基础设施层
    let timeout = Duration::from_secs(config.http.timeout_secs);
    let pool = db::connect(Path::new(&config.database.data_dir)).await?;
    let profiles = Arc::new(SqliteProfileStore::new(pool.clone()));
    let portfolios = Arc::new(SqlitePortfolioStore::new(pool.clone()));
    let payments = Arc::new(SqlitePaymentStore::new(pool));
    let clock = Arc::new(RealTimeProvider);
    let cache = Arc::new(MemCache::with_clock(clock.clone()));

    let prices = Arc::new(CoinGeckoProvider::new(
        config.market.price_api_url.as_str(),
        timeout,
    )?);
    let feed = Arc::new(RssNewsFeed::new(
        config.market.news_feed_url.as_str(),
        timeout,
    )?);
    let identity = Arc::new(SupabaseIdentity::new(
        config.identity.url.as_str(),
        config.identity.service_key.as_str(),
        timeout,
    )?);
    let gateway = Arc::new(PaystackGateway::new(
        config.payment.base_url.as_str(),
        config.payment.secret_key.as_str(),
        timeout,
    )?);

    // 4. 应用服务层
    let news = NewsAggregator::new(
        feed,
        cache,
        clock.clone(),
        NewsSettings::from(&config.market),
    );
    let holdings = HoldingService::new(portfolios.clone());
    let valuation = ValuationEngine::new(portfolios, prices, config.market.price_failure);
    let billing = EntitlementService::new(
        gateway,
        profiles.clone(),
        payments,
        clock,
        BillingSettings::from(&config),
    );

    let state = AppState {
        identity,
        profiles,
        news: Arc::new(news),
        holdings: Arc::new(holdings),
        valuation: Arc::new(valuation),
        billing: Arc::new(billing),
    };

    // 5. 启动 HTTP 服务
    start_server(state, &config.bind_addr(), &config.server.allowed_origins).await?;
    info!("CryptoIQ backend stopped");

    Ok(())
}
