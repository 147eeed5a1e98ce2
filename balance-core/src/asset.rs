//! Asset valuation structures

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BalanceResult;
use crate::source::Source;

/// A named holding and its current value in JPY
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Display name of the holding
    pub name: String,

    /// Current value in JPY
    pub value: Decimal,

    /// Value when bought, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bought: Option<Decimal>,
}

impl Asset {
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
            bought: None,
        }
    }
}

/// Sum the values of a set of assets
pub fn total_value(assets: &[Asset]) -> Decimal {
    assets.iter().map(|a| a.value).sum()
}

/// A provider that can report its wallet balance in JPY
///
/// Implementations run whatever preparation they need (token refresh,
/// address lookup) inside each call.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Which source this is
    fn source(&self) -> Source;

    /// Current total balance in JPY
    async fn fetch_total(&self) -> BalanceResult<Decimal>;

    /// Current balance broken down by holding
    async fn fetch_assets(&self) -> BalanceResult<Vec<Asset>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_value() {
        let assets = vec![Asset::new("Cash", dec!(150)), Asset::new("Position", dec!(75.5))];
        assert_eq!(total_value(&assets), dec!(225.5));
        assert_eq!(total_value(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_asset_json_omits_unknown_bought() {
        let json = serde_json::to_value(Asset::new("PayPay Point", dec!(12))).unwrap();
        assert_eq!(json["name"], "PayPay Point");
        assert!(json.get("bought").is_none());
    }
}
