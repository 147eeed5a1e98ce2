//! Balance CLI
//!
//! Bootstraps provider credentials and prints balances. Results go to stdout,
//! logs and prompts to stderr.

use std::io::{self, Write};

use anyhow::Context;
use balance_cli::cli::{PaypayCommand, PolymarketCommand};
use balance_cli::{exit_code_for, exit_codes, flows, logging, Cli, Commands};
use balance_core::{load_dotenv, require_env, AssetSource, Source};
use balance_paypay::{LoginConfig, PayPayClient, PayPayConfig, PayPaySource};
use balance_polymarket::{ClobClient, PolymarketSource};
use clap::Parser;
use tracing::{info, warn};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    // Load environment variables from .env.local / .env
    let dotenv_warnings = load_dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose);
    for warning in &dotenv_warnings {
        warn!("{}", warning);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::FAILURE;
        }
    };

    match rt.block_on(dispatch(cli.command)) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Paypay(PaypayCommand::Login) => {
            let login = LoginConfig::from_env()?;

            let mut client = PayPayClient::new();
            detect_app_version(&mut client).await;
            client
                .start_login(&login.phone, &login.password)
                .await
                .context("Failed to start PayPay login")?;

            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut prompt = io::stderr();
            flows::paypay_login::run(&mut client, &mut input, &mut prompt, &mut out).await?;
        }
        Commands::Paypay(PaypayCommand::Balance {
            access_token,
            refresh_token,
            investment,
        }) => {
            let access_token = match access_token {
                Some(token) => token,
                None => require_env("PAYPAY_ACCESS_TOKEN")?,
            };
            let refresh_token = match refresh_token {
                Some(token) => token,
                None => require_env("PAYPAY_REFRESH_TOKEN")?,
            };

            let config = PayPayConfig::new(access_token, refresh_token).with_device_ids_from_env();
            let mut client = PayPayClient::from_config(&config);
            detect_app_version(&mut client).await;

            flows::paypay_balance::run(&mut client, &config.refresh_token, investment, &mut out)
                .await?;
        }
        Commands::Paypay(PaypayCommand::History { size }) => {
            let config = PayPayConfig::from_env()?;
            let mut client = PayPayClient::from_config(&config);
            detect_app_version(&mut client).await;

            flows::paypay_history::run(&mut client, &config.refresh_token, size, &mut out).await?;
        }
        Commands::Polymarket(PolymarketCommand::ApiKeys) => {
            let mut client = ClobClient::from_env()?;
            info!("Using wallet {}", client.address());

            flows::polymarket_keys::run(&mut client, &mut out).await?;
        }
        Commands::Assets { source } => {
            let source: Box<dyn AssetSource> = match source {
                Source::PayPay => Box::new(PayPaySource::from_env()?),
                Source::Polymarket => Box::new(PolymarketSource::from_env()?),
            };

            flows::assets::run(source.as_ref(), &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}

async fn detect_app_version(client: &mut PayPayClient) {
    if let Err(e) = client.detect_app_version().await {
        warn!("Using default PayPay app version: {}", e);
    }
}
