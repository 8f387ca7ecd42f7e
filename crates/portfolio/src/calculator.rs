use cryptoiq_core::common::money::{CURRENCY_DP, QUANTITY_DP, round};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("Missing fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("Fields must be greater than 0: {}", .0.join(", "))]
    NonPositive(Vec<&'static str>),
    #[error("Values are too large to calculate")]
    Overflow,
}

/// # Summary
/// 计算器输入，字段均可缺省以便给出明确的缺失提示。
#[derive(Debug, Clone, Default)]
pub struct ProfitInput {
    // 投入金额 (USD)
    pub amount: Option<Decimal>,
    pub buy_price: Option<Decimal>,
    pub sell_price: Option<Decimal>,
}

/// # Summary
/// 计算结果，已按展示精度舍入。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitReport {
    // 买入币数，8 位小数
    pub coins_bought: Decimal,
    pub new_value: Decimal,
    pub profit: Decimal,
    // 收益率 (%)
    pub growth: Decimal,
}

/// # Summary
/// 根据投入金额与买卖价计算收益。
///
/// # Logic
/// 1. 三个字段必须全部存在且大于 0，否则不做任何计算直接返回错误。
/// 2. `coins = amount / buy_price`，`new_value = coins * sell_price`。
/// 3. `profit = new_value - amount`，`growth = profit / amount * 100`。
/// 4. 中间值不舍入，输出时币数保留 8 位、其余保留 2 位。
pub fn calculate(input: &ProfitInput) -> Result<ProfitReport, CalculatorError> {
    let fields = [
        ("amount", input.amount),
        ("buyPrice", input.buy_price),
        ("sellPrice", input.sell_price),
    ];

    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(CalculatorError::Missing(missing));
    }

    let non_positive: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.is_some_and(|v| v <= Decimal::ZERO))
        .map(|(name, _)| *name)
        .collect();
    if !non_positive.is_empty() {
        return Err(CalculatorError::NonPositive(non_positive));
    }

    let (Some(amount), Some(buy_price), Some(sell_price)) =
        (input.amount, input.buy_price, input.sell_price)
    else {
        return Err(CalculatorError::Missing(Vec::new()));
    };

    let coins = amount
        .checked_div(buy_price)
        .ok_or(CalculatorError::Overflow)?;
    let new_value = coins
        .checked_mul(sell_price)
        .ok_or(CalculatorError::Overflow)?;
    let profit = new_value
        .checked_sub(amount)
        .ok_or(CalculatorError::Overflow)?;
    let growth = profit
        .checked_div(amount)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(CalculatorError::Overflow)?;

    Ok(ProfitReport {
        coins_bought: round(coins, QUANTITY_DP),
        new_value: round(new_value, CURRENCY_DP),
        profit: round(profit, CURRENCY_DP),
        growth: round(growth, CURRENCY_DP),
    })
}
