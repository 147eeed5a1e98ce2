//! PayPay integration for the balance sources
//!
//! This crate provides a client for the PayPay mobile app backend:
//! login bootstrap, token refresh, wallet balances, and history.
//!
//! Authenticated calls need the tokens printed by the login flow:
//! - `PAYPAY_ACCESS_TOKEN` - Access token (valid for about three months)
//! - `PAYPAY_REFRESH_TOKEN` - Refresh token
//! - `PAYPAY_DEVICE_UUID` / `PAYPAY_CLIENT_UUID` - Device ids the tokens were issued to

pub mod api;
pub mod client;
pub mod config;
pub mod source;
pub mod types;

pub use api::PayPayApi;
pub use client::PayPayClient;
pub use config::{LoginConfig, PayPayConfig};
pub use source::PayPaySource;
pub use types::{investment_valuation, parse_login_id, BalanceSnapshot, PayPayCredentials};
