//! PayPay API response types
//!
//! These types mirror the PayPay mobile BFF responses and are converted
//! to the snapshot and credential types printed by the CLI.

use balance_core::{BalanceError, BalanceResult, EnvExport, ExportVars};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base URL for the mobile app backend
pub const APP_API_BASE: &str = "https://app4.paypay.ne.jp";

/// Base URL for the web portal (OAuth pages)
pub const WEB_API_BASE: &str = "https://www.paypay.ne.jp";

/// OAuth client id the mobile app identifies as
pub const CLIENT_ID: &str = "pay2-mobile-app-client";

/// Redirect URI registered for the mobile app client
pub const REDIRECT_URI: &str = "paypay://oauth2/callback";

/// Prefix of the one-time login link sent by SMS
pub const LOGIN_URL_PREFIX: &str = "https://www.paypay.ne.jp/portal/oauth2/l?id=";

/// App version sent when the App Store lookup is skipped or fails
pub const DEFAULT_APP_VERSION: &str = "4.78.0";

/// iOS version the client impersonates
pub const IOS_VERSION: &str = "16.7.5";

/// Result code of a successful call
pub const RESULT_SUCCESS: &str = "S0000";

/// Result codes meaning the tokens are no longer valid
pub const RESULT_AUTH_FAILURES: [&str; 3] = ["S0001", "S0003", "S1003"];

/// Path to the investment valuation inside a point-history response
pub const INVESTMENT_VALUATION_PATH: [&str; 4] =
    ["payload", "pointDetails", "investmentAssets", "valuationAmount"];

// ============================================================================
// Envelope
// ============================================================================

/// Header carried by every BFF response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    pub result_code: String,
    #[serde(default)]
    pub result_message: Option<String>,
}

impl ResponseHeader {
    /// Map a non-success result code to an error
    pub fn check(&self) -> BalanceResult<()> {
        if self.result_code == RESULT_SUCCESS {
            return Ok(());
        }

        let message = format!(
            "{} ({})",
            self.result_message.as_deref().unwrap_or("no message"),
            self.result_code
        );

        if RESULT_AUTH_FAILURES.contains(&self.result_code.as_str()) {
            Err(BalanceError::auth(message))
        } else {
            Err(BalanceError::source("PayPay", message))
        }
    }
}

/// Generic BFF response: `{ "header": {...}, "payload": {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub header: ResponseHeader,
    pub payload: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check the result code and return the payload
    pub fn into_payload(self) -> BalanceResult<T> {
        self.header.check()?;
        self.payload
            .ok_or_else(|| BalanceError::missing_field("payload"))
    }
}

// ============================================================================
// OAuth
// ============================================================================

/// Payload of a pushed authorization request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParPayload {
    pub request_uri: String,
}

/// Payload of the one-time-link authorization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationPayload {
    pub redirect_uri: String,
}

/// Payload of a token or refresh exchange
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
}

/// Long-lived credentials produced by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPayCredentials {
    pub device_uuid: String,
    pub client_uuid: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl ExportVars for PayPayCredentials {
    fn export_vars(&self) -> Vec<EnvExport> {
        vec![
            EnvExport::new("PAYPAY_DEVICE_UUID", &self.device_uuid),
            EnvExport::new("PAYPAY_CLIENT_UUID", &self.client_uuid),
            EnvExport::new("PAYPAY_ACCESS_TOKEN", &self.access_token),
            EnvExport::new("PAYPAY_REFRESH_TOKEN", &self.refresh_token),
        ]
    }
}

/// Extract the login id from a one-time link or a bare id
///
/// Accepts `https://www.paypay.ne.jp/portal/oauth2/l?id=TK4602` as well as
/// `TK4602`. The id ends up in a URL path, so only ASCII letters, digits,
/// `-` and `_` are allowed.
pub fn parse_login_id(input: &str) -> BalanceResult<String> {
    let trimmed = input.trim();
    let id = match trimmed.strip_prefix(LOGIN_URL_PREFIX) {
        Some(rest) => rest.split('&').next().unwrap_or(rest).to_string(),
        None if trimmed.starts_with("https://") => {
            let parsed = url::Url::parse(trimmed)
                .map_err(|e| BalanceError::input(format!("Invalid login URL: {}", e)))?;
            parsed
                .query_pairs()
                .find(|(k, _)| k == "id")
                .map(|(_, v)| v.into_owned())
                .ok_or_else(|| BalanceError::input("Login URL has no id parameter"))?
        }
        None => trimmed.to_string(),
    };

    if id.is_empty() {
        return Err(BalanceError::input("Login id is empty"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BalanceError::input(format!("Invalid login id: {:?}", id)));
    }
    Ok(id)
}

// ============================================================================
// Balance
// ============================================================================

/// A single balance amount
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceAmount {
    pub balance: Decimal,
}

/// Response payload of GET /bff/v2/getBalanceInfo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInfoPayload {
    pub wallet_detail: WalletDetail,
    pub wallet_summary: WalletSummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDetail {
    /// Not present for accounts without identity verification
    #[serde(default)]
    pub emoney_balance_info: Option<BalanceAmount>,
    pub prepaid_balance_info: BalanceAmount,
    pub cash_back_balance_info: BalanceAmount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub all_total_balance_info: BalanceAmount,
    pub usable_balance_info_without_cashback: BalanceAmount,
}

/// One read of the wallet balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub all_balance: Decimal,
    pub usable_balance: Decimal,
    pub money_light: Decimal,
    pub money: Option<Decimal>,
    pub point: Decimal,
}

impl BalanceSnapshot {
    /// Values in print order: total, usable, money light, money, point
    pub fn lines(&self) -> [Decimal; 5] {
        [
            self.all_balance,
            self.usable_balance,
            self.money_light,
            self.money.unwrap_or(Decimal::ZERO),
            self.point,
        ]
    }
}

impl From<BalanceInfoPayload> for BalanceSnapshot {
    fn from(payload: BalanceInfoPayload) -> Self {
        Self {
            all_balance: payload.wallet_summary.all_total_balance_info.balance,
            usable_balance: payload
                .wallet_summary
                .usable_balance_info_without_cashback
                .balance,
            money_light: payload.wallet_detail.prepaid_balance_info.balance,
            money: payload.wallet_detail.emoney_balance_info.map(|b| b.balance),
            point: payload.wallet_detail.cash_back_balance_info.balance,
        }
    }
}

// ============================================================================
// History
// ============================================================================

/// Response payload of GET /bff/v2/getPay2BalanceHistory
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPayload {
    #[serde(default)]
    pub history_list: Vec<Value>,
}

/// Read the investment valuation out of a point-history response
///
/// Every key on the path must be present; there is no zero fallback.
pub fn investment_valuation(point_history: &Value) -> BalanceResult<Decimal> {
    let mut node = point_history;
    for (depth, key) in INVESTMENT_VALUATION_PATH.iter().enumerate() {
        node = node.get(key).ok_or_else(|| {
            BalanceError::missing_field(INVESTMENT_VALUATION_PATH[..=depth].join("."))
        })?;
    }

    serde_json::from_value(node.clone()).map_err(|e| {
        BalanceError::parse(format!(
            "{} is not a number: {}",
            INVESTMENT_VALUATION_PATH.join("."),
            e
        ))
    })
}
