//! # `cryptoiq-api` - HTTP API 网关
//!
//! 本 crate 是 CryptoIQ 后端的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收前端或支付服务商的 HTTP 请求
//! - 对受保护路由执行 Bearer 鉴权 (交由身份服务校验)
//! - 调用下层新闻、持仓、估值、计费服务完成业务操作
//! - 将领域模型转换为 DTO 返回给前端

pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;
