//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。
//! 金额统一以定点字符串输出，避免浮点误差。

use cryptoiq_core::common::Tier;
use cryptoiq_core::common::money::{CURRENCY_DP, QUANTITY_DP, fixed};
use cryptoiq_core::market::entity::NewsItem;
use cryptoiq_core::payment::entity::CheckoutSession;
use cryptoiq_core::store::port::{Holding, Profile};
use cryptoiq_portfolio::calculator::{ProfitInput, ProfitReport};
use cryptoiq_portfolio::service::HoldingInput;
use cryptoiq_portfolio::valuation::{AssetValuation, PortfolioSummary};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  计算器 DTO
// ============================================================

/// 收益计算请求体
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    /// 投入金额 (USD)
    #[schema(value_type = Option<f64>, example = 1000)]
    pub amount: Option<Decimal>,
    /// 买入价
    #[schema(value_type = Option<f64>, example = 100)]
    pub buy_price: Option<Decimal>,
    /// 卖出价
    #[schema(value_type = Option<f64>, example = 150)]
    pub sell_price: Option<Decimal>,
}

/// 收益计算结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    #[schema(example = "10.00000000")]
    pub coins_bought: String,
    #[schema(example = "1500.00")]
    pub new_value: String,
    #[schema(example = "500.00")]
    pub profit: String,
    /// 收益率 (%)
    #[schema(example = "50.00")]
    pub growth: String,
}

// ============================================================
//  新闻 DTO
// ============================================================

/// 新闻条目
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsItemResponse {
    #[schema(example = "Bitcoin hits new high")]
    pub title: String,
    #[schema(example = "https://cointelegraph.com/news/bitcoin-hits-new-high")]
    pub link: String,
    #[schema(example = "Sat, 17 Oct 2026 09:00:00 GMT")]
    pub published: String,
    #[schema(example = "Cointelegraph")]
    pub source: String,
}

// ============================================================
//  用户档案 DTO
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub role: Tier,
}

// ============================================================
//  持仓 DTO
// ============================================================

/// 新增或整体更新持仓的请求体
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HoldingRequest {
    /// 币种代码，写入时统一转为大写
    #[schema(example = "BTC")]
    pub coin: Option<String>,
    #[schema(value_type = Option<f64>, example = 0.5)]
    pub amount: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 64000)]
    pub buy_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HoldingResponse {
    pub id: String,
    #[schema(example = "BTC")]
    pub coin: String,
    #[schema(example = "0.5")]
    pub amount: String,
    #[schema(example = "64000")]
    pub buy_price: String,
    /// 创建时间 (ISO 8601)
    #[schema(example = "2026-10-17T09:00:00Z")]
    pub created_at: String,
}

/// 单个资产的估值
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetValuationResponse {
    pub id: String,
    #[schema(example = "BTC")]
    pub coin: String,
    pub amount: String,
    pub buy_price: String,
    /// 当前美元价格，保留上游精度
    #[schema(example = "64000.5")]
    pub current_price: String,
    #[schema(example = "200.00")]
    pub invested: String,
    #[schema(example = "300.00")]
    pub current_value: String,
    #[schema(example = "100.00")]
    pub profit: String,
    #[schema(example = "50.00")]
    pub profit_percent: String,
    /// 未收录币种或报价失败时为 false
    pub price_available: bool,
}

/// 组合汇总
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortfolioSummaryResponse {
    #[schema(example = "200.00")]
    pub total_invested: String,
    #[schema(example = "300.00")]
    pub total_current_value: String,
    #[schema(example = "100.00")]
    pub total_profit: String,
    #[schema(example = "50.00")]
    pub profit_percent: String,
    pub assets: Vec<AssetValuationResponse>,
}

// ============================================================
//  支付 DTO
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InitializePaymentResponse {
    #[schema(example = "https://checkout.paystack.com/0peioxfhpn")]
    pub authorization_url: String,
    #[schema(example = "cryptoiq_7f3c2a9b0d6e4f1a8b5c3d2e1f0a9b8c")]
    pub reference: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    #[schema(example = "Account upgraded to premium")]
    pub message: String,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

// ============================================================
//  请求 → 领域输入 / 领域模型 → DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<CalculateRequest> for ProfitInput {
    fn from(r: CalculateRequest) -> Self {
        Self {
            amount: r.amount,
            buy_price: r.buy_price,
            sell_price: r.sell_price,
        }
    }
}

impl From<ProfitReport> for CalculateResponse {
    fn from(r: ProfitReport) -> Self {
        Self {
            coins_bought: fixed(r.coins_bought, QUANTITY_DP),
            new_value: fixed(r.new_value, CURRENCY_DP),
            profit: fixed(r.profit, CURRENCY_DP),
            growth: fixed(r.growth, CURRENCY_DP),
        }
    }
}

impl From<NewsItem> for NewsItemResponse {
    fn from(n: NewsItem) -> Self {
        Self {
            title: n.title,
            link: n.link,
            published: n.published,
            source: n.source,
        }
    }
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            role: p.role,
        }
    }
}

impl From<HoldingRequest> for HoldingInput {
    fn from(r: HoldingRequest) -> Self {
        Self {
            coin: r.coin,
            amount: r.amount,
            buy_price: r.buy_price,
        }
    }
}

impl From<Holding> for HoldingResponse {
    fn from(h: Holding) -> Self {
        Self {
            id: h.id,
            coin: h.coin,
            amount: h.amount.normalize().to_string(),
            buy_price: h.buy_price.normalize().to_string(),
            created_at: h.created_at.to_rfc3339(),
        }
    }
}

impl From<AssetValuation> for AssetValuationResponse {
    fn from(a: AssetValuation) -> Self {
        Self {
            id: a.id,
            coin: a.coin,
            amount: a.amount.normalize().to_string(),
            buy_price: a.buy_price.normalize().to_string(),
            current_price: a.current_price.normalize().to_string(),
            invested: fixed(a.invested, CURRENCY_DP),
            current_value: fixed(a.current_value, CURRENCY_DP),
            profit: fixed(a.profit, CURRENCY_DP),
            profit_percent: fixed(a.profit_percent, CURRENCY_DP),
            price_available: a.price_available,
        }
    }
}

impl From<PortfolioSummary> for PortfolioSummaryResponse {
    fn from(s: PortfolioSummary) -> Self {
        Self {
            total_invested: fixed(s.total_invested, CURRENCY_DP),
            total_current_value: fixed(s.total_current_value, CURRENCY_DP),
            total_profit: fixed(s.total_profit, CURRENCY_DP),
            profit_percent: fixed(s.profit_percent, CURRENCY_DP),
            assets: s.assets.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CheckoutSession> for InitializePaymentResponse {
    fn from(s: CheckoutSession) -> Self {
        Self {
            authorization_url: s.authorization_url,
            reference: s.reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_calculate_request_is_camel_case() {
        let req: CalculateRequest =
            serde_json::from_str(r#"{"amount":1000,"buyPrice":"100","sellPrice":150.5}"#).unwrap();
        assert_eq!(req.amount, Some(dec!(1000)));
        assert_eq!(req.buy_price, Some(dec!(100)));
        assert_eq!(req.sell_price, Some(dec!(150.5)));
    }

    #[test]
    fn test_report_is_fixed_point() {
        let resp = CalculateResponse::from(ProfitReport {
            coins_bought: dec!(10),
            new_value: dec!(1500),
            profit: dec!(500),
            growth: dec!(50),
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["coinsBought"], "10.00000000");
        assert_eq!(json["newValue"], "1500.00");
        assert_eq!(json["profit"], "500.00");
        assert_eq!(json["growth"], "50.00");
    }
}
