use crate::PortfolioError;
use cryptoiq_core::store::port::{Holding, HoldingDraft, PortfolioStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// # Summary
/// 客户端提交的持仓字段，校验通过后转为 `HoldingDraft`。
#[derive(Debug, Clone, Default)]
pub struct HoldingInput {
    pub coin: Option<String>,
    pub amount: Option<Decimal>,
    pub buy_price: Option<Decimal>,
}

impl HoldingInput {
    /// # Summary
    /// 校验并归一化。
    ///
    /// # Logic
    /// 1. `coin` 去除空白后不得为空，统一转为大写。
    /// 2. `amount` 与 `buy_price` 必须存在且大于 0。
    pub fn validate(&self) -> Result<HoldingDraft, PortfolioError> {
        let coin = self
            .coin
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| PortfolioError::Validation("coin is required".to_string()))?
            .to_uppercase();

        Ok(HoldingDraft {
            coin,
            amount: positive("amount", self.amount)?,
            buy_price: positive("buy_price", self.buy_price)?,
        })
    }
}

fn positive(field: &str, value: Option<Decimal>) -> Result<Decimal, PortfolioError> {
    match value {
        None => Err(PortfolioError::Validation(format!("{} is required", field))),
        Some(v) if v <= Decimal::ZERO => Err(PortfolioError::Validation(format!(
            "{} must be greater than 0",
            field
        ))),
        Some(v) => Ok(v),
    }
}

/// # Summary
/// 持仓应用服务，所有操作都以调用方用户 ID 限定范围。
pub struct HoldingService {
    store: Arc<dyn PortfolioStore>,
}

impl HoldingService {
    pub fn new(store: Arc<dyn PortfolioStore>) -> Self {
        Self { store }
    }

    /// 按创建时间倒序列出持仓
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Holding>, PortfolioError> {
        Ok(self.store.list_holdings(owner_id).await?)
    }

    pub async fn create(
        &self,
        owner_id: &str,
        input: &HoldingInput,
    ) -> Result<Holding, PortfolioError> {
        let draft = input.validate()?;
        let holding = self.store.insert_holding(owner_id, &draft).await?;
        info!("Holding {} ({}) created for {}", holding.id, holding.coin, owner_id);
        Ok(holding)
    }

    /// # Summary
    /// 整体更新一笔持仓。
    ///
    /// # Returns
    /// 记录不存在或属于其他用户时返回 `PortfolioError::NotFound`。
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        input: &HoldingInput,
    ) -> Result<Holding, PortfolioError> {
        let draft = input.validate()?;
        Ok(self.store.update_holding(owner_id, id, &draft).await?)
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<(), PortfolioError> {
        self.store.delete_holding(owner_id, id).await?;
        info!("Holding {} deleted for {}", id, owner_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(coin: &str, amount: Decimal, buy_price: Decimal) -> HoldingInput {
        HoldingInput {
            coin: Some(coin.to_string()),
            amount: Some(amount),
            buy_price: Some(buy_price),
        }
    }

    #[test]
    fn test_validate_normalizes_symbol() {
        let draft = input(" btc ", Decimal::ONE, Decimal::TEN).validate().unwrap();
        assert_eq!(draft.coin, "BTC");
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let cases = [
            (input("  ", Decimal::ONE, Decimal::ONE), "coin is required"),
            (
                input("ETH", Decimal::ZERO, Decimal::ONE),
                "amount must be greater than 0",
            ),
            (
                input("ETH", Decimal::ONE, Decimal::NEGATIVE_ONE),
                "buy_price must be greater than 0",
            ),
            (
                HoldingInput {
                    coin: Some("ETH".to_string()),
                    amount: None,
                    buy_price: Some(Decimal::ONE),
                },
                "amount is required",
            ),
        ];
        for (bad, message) in cases {
            let err = bad.validate().unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }
}
