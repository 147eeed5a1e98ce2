//! Cash and position value for the Polymarket wallet
//!
//! Cash is the USDC.e balance of the proxy wallet on Polygon, read through the
//! Etherscan V2 multichain API. Position value comes from the public Data API.
//! Both are converted to JPY with a fixed rate.

use std::time::Duration;

use async_trait::async_trait;
use balance_core::{
    Asset, AssetSource, BalanceError, BalanceResult, Source, optional_env, require_env,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::types::{
    ClobError, PortfolioValue, Result, TokenBalanceResponse, DATA_API_BASE, ETHERSCAN_API_BASE,
    POLYGON_CHAIN_ID, USDC_ADDRESS,
};

/// USDC has 6 decimals
const USDC_DECIMALS: u32 = 6;

/// JPY per USD when `POLYMARKET_JPY_RATE` is not set
pub const DEFAULT_JPY_RATE: u32 = 150;

pub const ADDRESS_ENV: &str = "POLYGON_ADDRESS";
pub const API_KEY_ENV: &str = "POLYSCAN_API_KEY";
pub const JPY_RATE_ENV: &str = "POLYMARKET_JPY_RATE";

// ============================================================================
// Configuration
// ============================================================================

#[derive(Clone)]
pub struct PolymarketConfig {
    /// Polygon address holding the USDC and positions
    pub address: String,
    /// Etherscan API key (V2 keys work across chains)
    pub api_key: String,
    pub jpy_rate: Decimal,
}

impl PolymarketConfig {
    pub fn new(address: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            api_key: api_key.into(),
            jpy_rate: Decimal::from(DEFAULT_JPY_RATE),
        }
    }

    pub fn with_jpy_rate(mut self, jpy_rate: Decimal) -> Self {
        self.jpy_rate = jpy_rate;
        self
    }

    pub fn from_env() -> BalanceResult<Self> {
        let address = require_env(ADDRESS_ENV)?;
        let api_key = require_env(API_KEY_ENV)?;
        let config = Self::new(address, api_key);

        match optional_env(JPY_RATE_ENV) {
            Some(rate) => {
                let rate = rate.trim().parse::<Decimal>().map_err(|e| {
                    BalanceError::config(format!("{} is not a number: {}", JPY_RATE_ENV, e))
                })?;
                Ok(config.with_jpy_rate(rate))
            }
            None => Ok(config),
        }
    }
}

impl std::fmt::Debug for PolymarketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolymarketConfig")
            .field("address", &self.address)
            .field("api_key", &"[REDACTED]")
            .field("jpy_rate", &self.jpy_rate)
            .finish()
    }
}

// ============================================================================
// Balance Client
// ============================================================================

/// Reads cash and position value for one address
pub struct BalanceClient {
    http_client: reqwest::Client,
    etherscan_url: String,
    data_api_url: String,
}

impl BalanceClient {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            etherscan_url: ETHERSCAN_API_BASE.to_string(),
            data_api_url: DATA_API_BASE.to_string(),
        }
    }

    /// USDC.e balance in USD
    pub async fn get_usdc_balance(&self, address: &str, api_key: &str) -> Result<Decimal> {
        let chain_id = POLYGON_CHAIN_ID.to_string();
        debug!("Fetching USDC balance for {}", address);

        let response = self
            .http_client
            .get(&self.etherscan_url)
            .query(&[
                ("chainid", chain_id.as_str()),
                ("module", "account"),
                ("action", "tokenbalance"),
                ("contractaddress", USDC_ADDRESS),
                ("address", address),
                ("tag", "latest"),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClobError::Api(format!(
                "Etherscan request failed: {} - {}",
                status, body
            )));
        }

        let balance: TokenBalanceResponse = response.json().await?;
        let raw = token_balance_result(balance)?;
        usdc_to_decimal(&raw)
    }

    /// Current value of all open positions in USD
    pub async fn get_position_value(&self, address: &str) -> Result<Decimal> {
        let url = format!("{}/value", self.data_api_url);
        debug!("Fetching position value for {}", address);

        let response = self
            .http_client
            .get(&url)
            .query(&[("user", address)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClobError::Api(format!(
                "Data API request failed: {} - {}",
                status, body
            )));
        }

        let values: Vec<PortfolioValue> = response.json().await?;
        first_value(&values)
    }
}

impl Default for BalanceClient {
    fn default() -> Self {
        Self::new()
    }
}

fn token_balance_result(response: TokenBalanceResponse) -> Result<String> {
    if response.status != "1" {
        let reason = response
            .result
            .or(response.message)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ClobError::Api(format!("Etherscan error: {}", reason)));
    }

    response
        .result
        .ok_or_else(|| ClobError::Api("No result in Etherscan response".to_string()))
}

fn first_value(values: &[PortfolioValue]) -> Result<Decimal> {
    let entry = values
        .first()
        .ok_or_else(|| ClobError::from(BalanceError::missing_field("[0].value")))?;

    Decimal::try_from(entry.value)
        .map_err(|e| ClobError::Api(format!("Invalid position value {}: {}", entry.value, e)))
}

/// Convert a raw USDC amount (smallest units) to USD
pub fn usdc_to_decimal(raw: &str) -> Result<Decimal> {
    let raw = raw
        .trim()
        .parse::<i128>()
        .map_err(|e| ClobError::Api(format!("Invalid token balance {:?}: {}", raw, e)))?;

    Ok(Decimal::from_i128_with_scale(raw, USDC_DECIMALS).normalize())
}

// ============================================================================
// Asset Source
// ============================================================================

pub struct PolymarketSource {
    config: PolymarketConfig,
    client: BalanceClient,
}

impl PolymarketSource {
    pub fn new(config: PolymarketConfig) -> Self {
        Self {
            config,
            client: BalanceClient::new(),
        }
    }

    pub fn from_env() -> BalanceResult<Self> {
        Ok(Self::new(PolymarketConfig::from_env()?))
    }

    async fn cash(&self) -> BalanceResult<Decimal> {
        let usd = self
            .client
            .get_usdc_balance(&self.config.address, &self.config.api_key)
            .await?;
        Ok(to_jpy(usd, self.config.jpy_rate))
    }

    async fn position(&self) -> BalanceResult<Decimal> {
        let usd = self.client.get_position_value(&self.config.address).await?;
        Ok(to_jpy(usd, self.config.jpy_rate))
    }
}

fn to_jpy(usd: Decimal, rate: Decimal) -> Decimal {
    (usd * rate).normalize()
}

#[async_trait]
impl AssetSource for PolymarketSource {
    fn source(&self) -> Source {
        Source::Polymarket
    }

    async fn fetch_total(&self) -> BalanceResult<Decimal> {
        let cash = self.cash().await?;
        let position = self.position().await?;
        Ok(cash + position)
    }

    async fn fetch_assets(&self) -> BalanceResult<Vec<Asset>> {
        let cash = self.cash().await?;
        let position = self.position().await?;
        info!("Polymarket cash {} JPY, positions {} JPY", cash, position);

        Ok(vec![Asset::new("Cash", cash), Asset::new("Position", position)])
    }
}
