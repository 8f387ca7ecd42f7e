use crate::PortfolioError;
use crate::symbols::coin_id;
use cryptoiq_core::common::money::{CURRENCY_DP, round};
use cryptoiq_core::config::PriceFailurePolicy;
use cryptoiq_core::market::port::PriceProvider;
use cryptoiq_core::store::port::{Holding, PortfolioStore};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// # Summary
/// 单笔持仓的估值结果。
///
/// # Invariants
/// - 金额类字段 (`invested` / `current_value` / `profit` / `profit_percent`) 已舍入到 2 位小数。
/// - `current_price` 保留上游原始精度。
#[derive(Debug, Clone, PartialEq)]
pub struct AssetValuation {
    pub id: String,
    pub coin: String,
    pub amount: Decimal,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    pub invested: Decimal,
    pub current_value: Decimal,
    pub profit: Decimal,
    pub profit_percent: Decimal,
    // 未收录的币种或报价失败时为 false，此时按 0 价估值
    pub price_available: bool,
}

/// # Summary
/// 组合汇总。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub total_profit: Decimal,
    pub profit_percent: Decimal,
    pub assets: Vec<AssetValuation>,
}

/// # Summary
/// 组合估值引擎。
///
/// # Invariants
/// - 每次估值至多发起一次批量报价请求。
/// - 报价失败按 `PriceFailurePolicy` 处理：降级为 0 价，或整体失败。
pub struct ValuationEngine {
    store: Arc<dyn PortfolioStore>,
    prices: Arc<dyn PriceProvider>,
    policy: PriceFailurePolicy,
}

impl ValuationEngine {
    pub fn new(
        store: Arc<dyn PortfolioStore>,
        prices: Arc<dyn PriceProvider>,
        policy: PriceFailurePolicy,
    ) -> Self {
        Self {
            store,
            prices,
            policy,
        }
    }

    /// # Summary
    /// 为用户的全部持仓估值。
    ///
    /// # Logic
    /// 1. 读取持仓，为空直接返回全 0 汇总。
    /// 2. 映射币种代码到行情 ID，未收录的不参与报价。
    /// 3. 去重后批量拉取美元价格。
    /// 4. 逐笔计算投入、现值、盈亏，再累加汇总。
    /// 5. 汇总收益率在投入为 0 时取 0。
    pub async fn summarize(&self, owner_id: &str) -> Result<PortfolioSummary, PortfolioError> {
        let holdings = self.store.list_holdings(owner_id).await?;
        if holdings.is_empty() {
            return Ok(PortfolioSummary::default());
        }

        let prices = self.fetch_prices(&holdings).await?;

        let mut total_invested = Decimal::ZERO;
        let mut total_current = Decimal::ZERO;
        let mut assets = Vec::with_capacity(holdings.len());

        for holding in holdings {
            let quote = coin_id(&holding.coin).and_then(|id| prices.get(id).copied());
            let current_price = quote.unwrap_or(Decimal::ZERO);

            let invested = checked_mul(holding.amount, holding.buy_price)?;
            let current_value = checked_mul(holding.amount, current_price)?;
            let profit = current_value - invested;

            total_invested = total_invested
                .checked_add(invested)
                .ok_or(PortfolioError::Overflow)?;
            total_current = total_current
                .checked_add(current_value)
                .ok_or(PortfolioError::Overflow)?;

            assets.push(AssetValuation {
                id: holding.id,
                coin: holding.coin,
                amount: holding.amount,
                buy_price: holding.buy_price,
                current_price,
                invested: round(invested, CURRENCY_DP),
                current_value: round(current_value, CURRENCY_DP),
                profit: round(profit, CURRENCY_DP),
                profit_percent: round(percent(profit, invested), CURRENCY_DP),
                price_available: quote.is_some(),
            });
        }

        let total_profit = total_current - total_invested;
        Ok(PortfolioSummary {
            total_invested: round(total_invested, CURRENCY_DP),
            total_current_value: round(total_current, CURRENCY_DP),
            total_profit: round(total_profit, CURRENCY_DP),
            profit_percent: round(percent(total_profit, total_invested), CURRENCY_DP),
            assets,
        })
    }

    async fn fetch_prices(
        &self,
        holdings: &[Holding],
    ) -> Result<HashMap<String, Decimal>, PortfolioError> {
        let mut ids: Vec<String> = holdings
            .iter()
            .filter_map(|h| coin_id(&h.coin))
            .map(str::to_string)
            .collect();
        ids.sort();
        ids.dedup();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        match self.prices.fetch_usd_prices(&ids).await {
            Ok(quotes) => {
                debug!("Fetched {} quotes for {} ids", quotes.len(), ids.len());
                Ok(quotes
                    .into_iter()
                    .map(|q| (q.coin_id, q.usd_price))
                    .collect())
            }
            Err(e) => match self.policy {
                PriceFailurePolicy::ZeroPrice => {
                    warn!("Price fetch failed, valuing holdings at zero: {}", e);
                    Ok(HashMap::new())
                }
                PriceFailurePolicy::Fail => Err(PortfolioError::Upstream(e)),
            },
        }
    }
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal, PortfolioError> {
    a.checked_mul(b).ok_or(PortfolioError::Overflow)
}

// 分母为 0 时收益率定义为 0
fn percent(profit: Decimal, invested: Decimal) -> Decimal {
    profit
        .checked_div(invested)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}
