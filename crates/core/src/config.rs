use serde::{Deserialize, Serialize};

/// 全局应用配置
///
/// 由 `cryptoiq-app` 通过 `config` crate 分层加载 (默认值 → 配置文件 → 环境变量)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub payment: PaymentConfig,
    pub market: MarketConfig,
    pub http: HttpConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 允许跨域的前端来源，为空时放开所有来源
    pub allowed_origins: Vec<String>,
    /// 前端站点根地址，用于拼接支付回调地址
    pub frontend_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub data_dir: String,
}

/// 身份验证服务 (Supabase Auth) 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub url: String,
    pub service_key: String,
}

/// 支付服务商 (Paystack) 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub base_url: String,
    pub secret_key: String,
    /// 高级版价格，单位为货币最小单位 (例如 kobo)
    pub plan_amount: i64,
    pub currency: String,
    /// 支付完成后跳回前端的路径，拼接在 `server.frontend_url` 之后
    pub callback_path: String,
}

/// 新闻拉取失败且没有旧缓存可用时的处理策略
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NewsFailurePolicy {
    /// 返回空列表，不打断调用方
    #[default]
    Empty,
    /// 向调用方显式报告上游失败
    Error,
}

/// 组合估值时报价拉取失败的处理策略
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceFailurePolicy {
    /// 所有资产按 0 价估值并标记为无报价
    #[default]
    ZeroPrice,
    /// 整个估值请求失败
    Fail,
}

/// 行情与新闻上游配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub price_api_url: String,
    pub news_feed_url: String,
    pub news_ttl_secs: u64,
    /// 每次从上游保留的最大条数
    pub news_fetch_limit: usize,
    /// 免费用户可见条数
    pub free_news_limit: usize,
    pub news_failure: NewsFailurePolicy,
    pub price_failure: PriceFailurePolicy,
}

/// 出站 HTTP 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// 默认日志过滤级别，可被 `RUST_LOG` 覆盖
    pub level: String,
    /// 设置后按天滚动写入该目录
    pub dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            allowed_origins: Vec::new(),
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            service_key: String::new(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.paystack.co".to_string(),
            secret_key: String::new(),
            plan_amount: 500_000,
            currency: "NGN".to_string(),
            callback_path: "/payment/callback".to_string(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            price_api_url: "https://api.coingecko.com/api/v3".to_string(),
            news_feed_url: "https://cointelegraph.com/rss".to_string(),
            news_ttl_secs: 30 * 60,
            news_fetch_limit: 10,
            free_news_limit: 3,
            news_failure: NewsFailurePolicy::default(),
            price_failure: PriceFailurePolicy::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 8 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// 监听地址，如 `0.0.0.0:5001`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 支付完成后的前端回调地址
    pub fn payment_callback_url(&self) -> String {
        format!(
            "{}{}",
            self.server.frontend_url.trim_end_matches('/'),
            self.payment.callback_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.market.news_ttl_secs, 1800);
        assert_eq!(config.market.news_fetch_limit, 10);
        assert_eq!(config.market.free_news_limit, 3);
        assert_eq!(config.http.timeout_secs, 8);
        assert_eq!(config.market.news_failure, NewsFailurePolicy::Empty);
        assert_eq!(config.market.price_failure, PriceFailurePolicy::ZeroPrice);
        assert_eq!(config.bind_addr(), "0.0.0.0:5001");
    }

    #[test]
    fn test_callback_url_joins_without_double_slash() {
        let mut config = AppConfig::default();
        config.server.frontend_url = "https://cryptoiq.app/".to_string();
        assert_eq!(
            config.payment_callback_url(),
            "https://cryptoiq.app/payment/callback"
        );
    }

    #[test]
    fn test_policies_deserialize_snake_case() {
        let market: MarketConfig = serde_json::from_str(
            r#"{"news_failure":"error","price_failure":"fail"}"#,
        )
        .unwrap();
        assert_eq!(market.news_failure, NewsFailurePolicy::Error);
        assert_eq!(market.price_failure, PriceFailurePolicy::Fail);
        // 未提供的字段回落到默认值
        assert_eq!(market.news_ttl_secs, 1800);
    }
}
