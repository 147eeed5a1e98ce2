//! PayPay as an asset source

use async_trait::async_trait;
use balance_core::{Asset, AssetSource, BalanceResult, Source};
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use crate::api::PayPayApi;
use crate::client::PayPayClient;
use crate::config::PayPayConfig;
use crate::types::{investment_valuation, BalanceSnapshot};

/// Reports PayPay wallet holdings in JPY
#[derive(Debug, Clone)]
pub struct PayPaySource {
    config: PayPayConfig,
}

impl PayPaySource {
    pub fn new(config: PayPayConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> BalanceResult<Self> {
        Ok(Self::new(PayPayConfig::from_env()?))
    }

    /// Build a client and refresh its token before use
    async fn connect(&self) -> BalanceResult<PayPayClient> {
        let mut client = PayPayClient::from_config(&self.config);
        if let Err(e) = client.detect_app_version().await {
            warn!("Using default PayPay app version: {}", e);
        }
        client.refresh_token(&self.config.refresh_token).await?;
        Ok(client)
    }
}

/// Break a snapshot and investment valuation into named assets
pub fn assets_from(snapshot: &BalanceSnapshot, investment: Decimal) -> Vec<Asset> {
    vec![
        Asset::new("PayPay Money", snapshot.money.unwrap_or(Decimal::ZERO)),
        Asset::new("PayPay Money Light", snapshot.money_light),
        Asset::new("PayPay Point", snapshot.point),
        Asset::new("PayPay Investment Points", investment),
    ]
}

#[async_trait]
impl AssetSource for PayPaySource {
    fn source(&self) -> Source {
        Source::PayPay
    }

    #[instrument(skip(self))]
    async fn fetch_total(&self) -> BalanceResult<Decimal> {
        let client = self.connect().await?;
        Ok(client.get_balance().await?.all_balance)
    }

    #[instrument(skip(self))]
    async fn fetch_assets(&self) -> BalanceResult<Vec<Asset>> {
        let client = self.connect().await?;
        let snapshot = client.get_balance().await?;
        let investment = investment_valuation(&client.get_point_history().await?)?;
        Ok(assets_from(&snapshot, investment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_assets_from_snapshot() {
        let snapshot = BalanceSnapshot {
            all_balance: dec!(1545),
            usable_balance: dec!(1500),
            money_light: dec!(300),
            money: Some(dec!(1200)),
            point: dec!(45),
        };

        let assets = assets_from(&snapshot, dec!(880));
        let names: Vec<&str> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "PayPay Money",
                "PayPay Money Light",
                "PayPay Point",
                "PayPay Investment Points"
            ]
        );
        assert_eq!(balance_core::total_value(&assets), dec!(2425));
    }

    #[test]
    fn test_source_kind() {
        let source = PayPaySource::new(PayPayConfig::new("a", "r"));
        assert_eq!(source.source(), Source::PayPay);
    }
}
