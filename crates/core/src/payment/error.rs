use thiserror::Error;

/// # Summary
/// 支付服务商交互错误。
#[derive(Error, Debug)]
pub enum PaymentError {
    // 网络层错误 (含超时)
    #[error("Network error: {0}")]
    Network(String),
    // 服务商拒绝请求 (status=false 或非 2xx)
    #[error("Provider rejected request: {0}")]
    Rejected(String),
    // 响应体无法解析
    #[error("Parse error: {0}")]
    Parse(String),
    // 客户端初始化失败
    #[error("Client error: {0}")]
    Client(String),
}
