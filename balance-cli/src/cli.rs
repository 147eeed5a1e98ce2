//! CLI definitions using clap derive API

use balance_core::{BalanceError, Source};
use balance_polymarket::ClobError;
use clap::{Parser, Subcommand};

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    /// Missing or malformed configuration (environment, keys)
    pub const CONFIG: i32 = 2;
}

/// Credential bootstrap and balance queries for PayPay and Polymarket
#[derive(Parser, Debug)]
#[command(name = "balance", author, version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// PayPay login, balance and history
    #[command(subcommand)]
    Paypay(PaypayCommand),

    /// Polymarket CLOB credentials
    #[command(subcommand)]
    Polymarket(PolymarketCommand),

    /// List the assets of one source as JSON
    Assets {
        /// paypay or polymarket
        source: Source,
    },
}

#[derive(Subcommand, Debug)]
pub enum PaypayCommand {
    /// Log in with PAYPAY_PHONE / PAYPAY_PASSWORD and print the tokens as exports
    Login,

    /// Print total, usable, money light, money and point balances
    Balance {
        #[arg(env = "PAYPAY_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        #[arg(env = "PAYPAY_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: Option<String>,

        /// Also print the investment valuation
        #[arg(long)]
        investment: bool,
    },

    /// Print recent balance history as JSON
    History {
        /// Number of entries
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum PolymarketCommand {
    /// Create or derive CLOB API credentials and print them as exports
    ApiKeys,
}

/// Map a failed command to its exit code
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    let is_config = error.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<BalanceError>() {
            e.is_config()
        } else if let Some(e) = cause.downcast_ref::<ClobError>() {
            e.is_config()
        } else {
            false
        }
    });

    if is_config {
        exit_codes::CONFIG
    } else {
        exit_codes::FAILURE
    }
}
