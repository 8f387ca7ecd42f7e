use thiserror::Error;

/// # Summary
/// 行情与新闻上游错误枚举，处理网络、超时、解析等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum MarketError {
    // 网络层错误 (含超时)，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 上游返回非 2xx 状态
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
    // 数据解析错误，如 JSON/XML 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 客户端初始化失败
    #[error("Client error: {0}")]
    Client(String),
}
