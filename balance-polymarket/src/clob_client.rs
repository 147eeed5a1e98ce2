//! L1-authenticated CLOB API client for Polymarket

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::api::ApiKeyProvider;
use crate::eip712::current_timestamp;
use crate::types::{
    ApiCredentials, ApiKeyResponse, ClobError, Result, CLOB_BASE_URL, POLYGON_CHAIN_ID,
};
use crate::wallet::TradingWallet;

// Header names
const HEADER_ADDRESS: &str = "POLY_ADDRESS";
const HEADER_SIGNATURE: &str = "POLY_SIGNATURE";
const HEADER_TIMESTAMP: &str = "POLY_TIMESTAMP";
const HEADER_NONCE: &str = "POLY_NONCE";

// ============================================================================
// CLOB Client
// ============================================================================

/// Client for the Polymarket CLOB key-management endpoints
pub struct ClobClient {
    wallet: TradingWallet,
    http_client: reqwest::Client,
    base_url: String,
    chain_id: u64,
    nonce: u64,
}

impl ClobClient {
    /// Create a new CLOB client bound to the production endpoint and Polygon
    pub fn new(wallet: TradingWallet) -> Self {
        // Build HTTP client with proper headers to avoid Cloudflare blocks
        let http_client = reqwest::Client::builder()
            .user_agent("balance-sources/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            wallet,
            http_client,
            base_url: CLOB_BASE_URL.to_string(),
            chain_id: POLYGON_CHAIN_ID,
            nonce: 0,
        }
    }

    /// Create a new CLOB client from environment
    pub fn from_env() -> Result<Self> {
        let wallet = TradingWallet::from_env()?;
        Ok(Self::new(wallet))
    }

    /// Use a different L1 nonce (keys are derived per nonce)
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Get the wallet address
    pub fn address(&self) -> String {
        self.wallet.address_string()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    // ========================================================================
    // L1 Authentication (EIP-712 signing for API key management)
    // ========================================================================

    /// Build L1 authentication headers
    async fn build_l1_headers(&self) -> Result<HeaderMap> {
        let timestamp = current_timestamp();
        let address = self.wallet.address_string();

        debug!(
            "Building L1 auth headers for {} (timestamp {}, nonce {})",
            address, timestamp, self.nonce
        );

        let signature = self
            .wallet
            .sign_l1_auth(timestamp, self.nonce, self.chain_id)
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert(HEADER_ADDRESS, header_value(&address)?);
        headers.insert(HEADER_SIGNATURE, header_value(&signature)?);
        headers.insert(HEADER_TIMESTAMP, header_value(&timestamp.to_string())?);
        headers.insert(HEADER_NONCE, header_value(&self.nonce.to_string())?);

        Ok(headers)
    }

    /// Create new API credentials (L1 auth)
    pub async fn create_api_key(&self) -> Result<ApiCredentials> {
        info!("Creating new API key for wallet {}", self.wallet.address_string());

        let headers = self.build_l1_headers().await?;
        let url = format!("{}/auth/api-key", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Failed to create API key: {} - {}", status, body);
            return Err(ClobError::Api(format!(
                "Failed to create API key: {} - {}",
                status, body
            )));
        }

        let api_key_response: ApiKeyResponse = response.json().await?;
        info!("API key created successfully");

        Ok(api_key_response.into())
    }

    /// Derive existing API credentials (L1 auth)
    pub async fn derive_api_key(&self) -> Result<ApiCredentials> {
        info!(
            "Deriving API key for wallet {}",
            self.wallet.address_string()
        );

        let headers = self.build_l1_headers().await?;
        let url = format!("{}/auth/derive-api-key", self.base_url);

        let response = self.http_client.get(&url).headers(headers).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClobError::Api(format!(
                "Failed to derive API key: {} - {}",
                status, body
            )));
        }

        let api_key_response: ApiKeyResponse = response.json().await?;
        info!("API key derived successfully");

        Ok(api_key_response.into())
    }
}

#[async_trait]
impl ApiKeyProvider for ClobClient {
    async fn create_or_derive_api_credentials(&mut self) -> Result<ApiCredentials> {
        match self.create_api_key().await {
            Ok(credentials) => Ok(credentials),
            Err(create_err) => {
                // A key already exists for this nonce; the CLOB refuses to create another
                warn!("Create failed ({}), deriving existing API key", create_err);
                self.derive_api_key().await
            }
        }
    }
}

impl std::fmt::Debug for ClobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClobClient")
            .field("wallet", &self.wallet)
            .field("base_url", &self.base_url)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ClobError::Api(format!("Invalid header value: {}", e)))
}
