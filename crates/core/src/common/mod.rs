use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

pub mod money;
pub mod time;
pub mod tls;

/// # Summary
/// 用户权益等级 (Entitlement)，决定新闻深度等功能范围。
///
/// # Invariants
/// - 序列化形式固定为小写 (`free` / `premium`)，与 `profiles.role` 列保持一致。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    // 免费用户
    #[default]
    Free,
    // 付费高级用户
    Premium,
}

impl Tier {
    pub fn is_premium(self) -> bool {
        self == Tier::Premium
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_and_display() {
        assert_eq!("premium".parse::<Tier>().unwrap(), Tier::Premium);
        assert_eq!(" FREE ".parse::<Tier>().unwrap(), Tier::Free);
        assert!("gold".parse::<Tier>().is_err());
        assert_eq!(Tier::Premium.to_string(), "premium");
        assert_eq!(Tier::default(), Tier::Free);
    }
}
