//! Shared types for Polymarket credentials and balances

use balance_core::{BalanceError, EnvExport, ExportVars};
use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoints
// ============================================================================

/// Polymarket CLOB API
pub const CLOB_BASE_URL: &str = "https://clob.polymarket.com";

/// Polymarket Data API (positions and portfolio value)
pub const DATA_API_BASE: &str = "https://data-api.polymarket.com";

/// Etherscan V2 multichain API
pub const ETHERSCAN_API_BASE: &str = "https://api.etherscan.io/v2/api";

/// USDC.e on Polygon
pub const USDC_ADDRESS: &str = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174";

/// Polygon Chain ID
pub const POLYGON_CHAIN_ID: u64 = 137;

// ============================================================================
// API Credentials
// ============================================================================

/// API credentials for L2 (HMAC) authentication
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredentials {
    pub api_key: String,
    pub secret: String,
    pub passphrase: String,
}

impl ExportVars for ApiCredentials {
    fn export_vars(&self) -> Vec<EnvExport> {
        vec![
            EnvExport::new("POLYMARKET_API_KEY", &self.api_key),
            EnvExport::quoted("POLYMARKET_API_SECRET", &self.secret),
            EnvExport::new("POLYMARKET_API_PASSPHRASE", &self.passphrase),
        ]
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

/// Response from API key creation or derivation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: String,
    pub secret: String,
    pub passphrase: String,
}

impl From<ApiKeyResponse> for ApiCredentials {
    fn from(response: ApiKeyResponse) -> Self {
        Self {
            api_key: response.api_key,
            secret: response.secret,
            passphrase: response.passphrase,
        }
    }
}

// ============================================================================
// Balance responses
// ============================================================================

/// Response from the Etherscan `tokenbalance` action
#[derive(Debug, Deserialize)]
pub struct TokenBalanceResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

/// One entry of the Data API `/value` response
#[derive(Debug, Deserialize)]
pub struct PortfolioValue {
    #[serde(default)]
    pub user: Option<String>,
    pub value: f64,
}

// ============================================================================
// Error Types
// ============================================================================

/// Polymarket errors
#[derive(Debug, thiserror::Error)]
pub enum ClobError {
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] BalanceError),
}

impl ClobError {
    /// Whether this error comes from absent or malformed local configuration
    pub fn is_config(&self) -> bool {
        match self {
            ClobError::Core(e) => e.is_config(),
            ClobError::Wallet(_) => true,
            _ => false,
        }
    }
}

impl From<ClobError> for BalanceError {
    fn from(error: ClobError) -> Self {
        match error {
            ClobError::Core(e) => e,
            ClobError::Http(e) => BalanceError::network(e.to_string()),
            ClobError::Json(e) => BalanceError::parse(e.to_string()),
            ClobError::Wallet(msg) => BalanceError::config(msg),
            other => BalanceError::source("Polymarket", other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClobError>;
