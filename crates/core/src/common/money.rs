//! 展示层定点格式化。

use rust_decimal::{Decimal, RoundingStrategy};

/// 货币类数值的小数位
pub const CURRENCY_DP: u32 = 2;
/// 币数量的小数位
pub const QUANTITY_DP: u32 = 8;

/// 按"四舍五入远离零"规则保留 `dp` 位小数。
pub fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// 保留 `dp` 位小数并补齐尾零后输出字符串，例如 `200` -> `"200.00"`。
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixed_pads_and_rounds() {
        assert_eq!(fixed(dec!(200), CURRENCY_DP), "200.00");
        assert_eq!(fixed(dec!(1.005), CURRENCY_DP), "1.01");
        assert_eq!(fixed(dec!(-1.005), CURRENCY_DP), "-1.01");
        assert_eq!(fixed(dec!(0.123456789), QUANTITY_DP), "0.12345679");
        assert_eq!(fixed(Decimal::ZERO, CURRENCY_DP), "0.00");
    }
}
