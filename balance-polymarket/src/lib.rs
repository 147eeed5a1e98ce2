//! Balance Polymarket - wallet auth and account value
//!
//! This crate provides:
//! - Wallet loading from a private key and EIP-712 L1 signing
//! - CLOB client that creates or derives API credentials
//! - Cash (USDC.e on Polygon) and open-position value as an asset source

pub mod api;
pub mod balance;
pub mod clob_client;
pub mod eip712;
pub mod types;
pub mod wallet;

pub use api::ApiKeyProvider;
pub use balance::{BalanceClient, PolymarketConfig, PolymarketSource, usdc_to_decimal};
pub use clob_client::ClobClient;
pub use eip712::current_timestamp;
pub use types::*;
pub use wallet::{PRIVATE_KEY_ENV, TradingWallet};
