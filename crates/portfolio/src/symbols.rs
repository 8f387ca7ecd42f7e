//! 币种代码 → CoinGecko 行情 ID 映射。

const COIN_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("BNB", "binancecoin"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("MATIC", "matic-network"),
    ("LTC", "litecoin"),
    ("USDT", "tether"),
    ("USDC", "usd-coin"),
    ("AVAX", "avalanche-2"),
    ("LINK", "chainlink"),
    ("SHIB", "shiba-inu"),
    ("TRX", "tron"),
];

/// 查询币种代码对应的行情 ID (忽略大小写与首尾空白)，未收录返回 `None`。
pub fn coin_id(symbol: &str) -> Option<&'static str> {
    let symbol = symbol.trim();
    COIN_IDS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(symbol))
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(coin_id("BTC"), Some("bitcoin"));
        assert_eq!(coin_id(" eth "), Some("ethereum"));
        assert_eq!(coin_id("Matic"), Some("matic-network"));
        assert_eq!(coin_id("PEPE"), None);
        assert_eq!(coin_id(""), None);
    }
}
