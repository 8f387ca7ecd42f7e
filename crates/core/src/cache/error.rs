use thiserror::Error;

/// 缓存读写错误。内存实现本身不会失败，错误只来自快照的 JSON 编解码。
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to encode cache value: {0}")]
    Serialize(String),
    /// 条目存在但内容与目标类型不符，调用方应视为未命中
    #[error("Failed to decode cache value: {0}")]
    Deserialize(String),
}
