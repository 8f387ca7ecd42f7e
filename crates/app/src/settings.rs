use config::{Config, ConfigError, Environment, File};
use cryptoiq_core::config::AppConfig;
use std::collections::HashMap;

/// 分层环境变量前缀，如 `CRYPTOIQ__SERVER__PORT`
const ENV_PREFIX: &str = "CRYPTOIQ";

/// 兼容的扁平环境变量与配置键的对应关系
const LEGACY_KEYS: [(&str, &str); 5] = [
    ("PORT", "server.port"),
    ("FRONTEND_URL", "server.frontend_url"),
    ("SUPABASE_URL", "identity.url"),
    ("SUPABASE_SERVICE_KEY", "identity.service_key"),
    ("PAYSTACK_SECRET_KEY", "payment.secret_key"),
];

/// # Summary
/// 按优先级分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. 叠加可选的配置文件 (不存在时跳过)。
/// 3. 叠加 `CRYPTOIQ__SECTION__KEY` 形式的环境变量。
/// 4. 最后以 `PORT`、`SUPABASE_URL` 等扁平变量覆盖，`ALLOWED_ORIGINS` 按逗号拆分。
///
/// # Arguments
/// * `config_file` - 配置文件路径 (不含扩展名时按 `config` crate 规则探测)
/// * `vars` - 环境变量快照，启动时传入 `std::env::vars()`
pub fn load(config_file: &str, vars: &HashMap<String, String>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::with_name(config_file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

    for (var, key) in LEGACY_KEYS {
        builder = builder.set_override_option(key, non_empty(vars, var))?;
    }
    builder = builder.set_override_option(
        "server.allowed_origins",
        non_empty(vars, "ALLOWED_ORIGINS").map(split_origins),
    )?;

    builder.build()?.try_deserialize()
}

/// 从字符串加载配置，仅用于校验配置片段。
#[cfg(test)]
fn load_str(toml: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize()
}

fn non_empty(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    vars.get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoiq_core::config::{NewsFailurePolicy, PriceFailurePolicy};
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = load("does-not-exist", &HashMap::new()).unwrap();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.market.news_ttl_secs, 1800);
        assert!(config.server.allowed_origins.is_empty());
        assert!(config.payment.secret_key.is_empty());
    }

    #[test]
    fn test_legacy_env_overrides() {
        let env = vars(&[
            ("PORT", "8080"),
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "service-role"),
            ("PAYSTACK_SECRET_KEY", "sk_live_x"),
            ("FRONTEND_URL", "https://cryptoiq.app"),
            ("ALLOWED_ORIGINS", "https://cryptoiq.app, http://localhost:5173,"),
        ]);
        let config = load("does-not-exist", &env).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.identity.url, "https://project.supabase.co");
        assert_eq!(config.identity.service_key, "service-role");
        assert_eq!(config.payment.secret_key, "sk_live_x");
        assert_eq!(
            config.server.allowed_origins,
            vec!["https://cryptoiq.app", "http://localhost:5173"]
        );
        assert_eq!(
            config.payment_callback_url(),
            "https://cryptoiq.app/payment/callback"
        );
    }

    #[test]
    fn test_file_then_prefixed_env_then_legacy() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 7000\n[market]\nnews_ttl_secs = 60\nnews_failure = \"error\""
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = load(&path, &HashMap::new()).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.market.news_ttl_secs, 60);
        assert_eq!(config.market.news_failure, NewsFailurePolicy::Error);

        let env = vars(&[
            ("CRYPTOIQ__SERVER__PORT", "7100"),
            ("CRYPTOIQ__MARKET__PRICE_FAILURE", "fail"),
        ]);
        let config = load(&path, &env).unwrap();
        assert_eq!(config.server.port, 7100);
        assert_eq!(config.market.price_failure, PriceFailurePolicy::Fail);

        let env = vars(&[("CRYPTOIQ__SERVER__PORT", "7100"), ("PORT", "7200")]);
        assert_eq!(load(&path, &env).unwrap().server.port, 7200);
    }

    #[test]
    fn test_blank_legacy_value_is_ignored() {
        let env = vars(&[("PORT", "  "), ("ALLOWED_ORIGINS", "")]);
        let config = load("does-not-exist", &env).unwrap();
        assert_eq!(config.server.port, 5001);
        assert!(config.server.allowed_origins.is_empty());
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        assert!(load_str("[market]\nprice_failure = \"guess\"").is_err());
        assert!(load_str("[log]\nlevel = \"debug\"").is_ok());
    }
}
