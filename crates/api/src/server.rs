//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 与请求追踪并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use cryptoiq_billing::service::EntitlementService;
use cryptoiq_core::identity::port::IdentityProvider;
use cryptoiq_core::store::port::ProfileStore;
use cryptoiq_news::aggregator::NewsAggregator;
use cryptoiq_portfolio::service::HoldingService;
use cryptoiq_portfolio::valuation::ValuationEngine;

use crate::middleware::auth::{auth_middleware, optional_auth_middleware};
use crate::routes::{calculator, health, news, paystack, portfolio, profile};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有服务在服务启动前由 DI 容器注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 身份服务 (Bearer 凭证校验)
    pub identity: Arc<dyn IdentityProvider>,
    /// 用户档案存储 (鉴权时建档)
    pub profiles: Arc<dyn ProfileStore>,
    /// 新闻聚合器
    pub news: Arc<NewsAggregator>,
    /// 持仓服务
    pub holdings: Arc<HoldingService>,
    /// 组合估值引擎
    pub valuation: Arc<ValuationEngine>,
    /// 付费权益服务
    pub billing: Arc<EntitlementService>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CryptoIQ API",
        version = "0.1.0",
        description = "CryptoIQ 后端 RESTful API：收益计算、新闻聚合、持仓估值与付费升级。",
        contact(name = "CryptoIQ Team")
    ),
    tags(
        (name = "系统 (System)", description = "存活探测"),
        (name = "计算器 (Calculator)", description = "买卖收益计算"),
        (name = "新闻 (News)", description = "按权益等级截取的加密货币新闻"),
        (name = "用户 (Profile)", description = "当前用户档案"),
        (name = "持仓 (Portfolio)", description = "持仓增删改查与实时估值"),
        (name = "支付 (Payment)", description = "高级版付款、核验与服务商 webhook")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// 为 OpenAPI 文档注入全局 Bearer 鉴权方案。
///
/// 注册后，Swagger UI 页面顶部将显示 Authorize 按钮，
/// 用户可以填入身份服务签发的 access token 后调试受保护接口。
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // 若 components 不存在则创建
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "在此处填入身份服务签发的 access token（无需 'Bearer ' 前缀）",
                    ))
                    .build(),
            ),
        );
    }
}

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建 CORS 层，来源列表为空时放开所有来源。
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 构建完整的 axum 应用路由树 (不绑定端口，便于测试直接挂载)。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `allowed_origins` - 允许跨域的前端来源
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    // 1. 无需鉴权的公开路由 (webhook 以签名代替凭证)
    let public_router = OpenApiRouter::new()
        .routes(routes!(health::health))
        .routes(routes!(calculator::calculate))
        .routes(routes!(paystack::webhook));

    // 2. 凭证可选的路由
    let optional_router = OpenApiRouter::new()
        .routes(routes!(news::get_news))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    // 3. 需要合法 Bearer 凭证的路由
    let protected_router = OpenApiRouter::new()
        .routes(routes!(profile::get_profile))
        .routes(routes!(portfolio::list_holdings))
        .routes(routes!(portfolio::create_holding))
        .routes(routes!(portfolio::get_summary))
        .routes(routes!(portfolio::update_holding))
        .routes(routes!(portfolio::delete_holding))
        .routes(routes!(paystack::initialize))
        .routes(routes!(paystack::verify))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // 4. 合并所有路由与自动收集的 OpenAPI Doc
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(public_router)
        .merge(optional_router)
        .merge(protected_router)
        .with_state(state)
        .split_for_parts();

    // 5. 合并 Swagger UI 路由并应用中间件 (CORS 在最外层，预检请求不会进入鉴权)
    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
}

/// 构建路由并启动 HTTP 监听，直到收到退出信号。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:5001"`
/// * `allowed_origins` - 允许跨域的前端来源
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
    allowed_origins: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state, allowed_origins);

    tracing::info!("CryptoIQ API listening on {}", bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("CryptoIQ API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
