//! Flow tests against stub providers
//!
//! Run with: cargo test -p balance-cli --test flows

use std::io::Cursor;

use async_trait::async_trait;
use balance_cli::flows;
use balance_core::{Asset, AssetSource, BalanceError, BalanceResult, Source};
use balance_paypay::{BalanceSnapshot, PayPayApi, PayPayCredentials};
use balance_polymarket::{ApiCredentials, ApiKeyProvider, ClobError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

// ============================================================================
// Stubs
// ============================================================================

#[derive(Default)]
struct StubPayPay {
    point_history: Value,
    fail_login: bool,
    fail_refresh: bool,
    calls: Vec<String>,
}

impl StubPayPay {
    fn with_investment(valuation: u64) -> Self {
        Self {
            point_history: json!({
                "header": { "resultCode": "S0000" },
                "payload": {
                    "pointDetails": {
                        "investmentAssets": { "valuationAmount": valuation }
                    }
                }
            }),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PayPayApi for StubPayPay {
    async fn login(&mut self, login_id: &str) -> BalanceResult<PayPayCredentials> {
        self.calls.push(format!("login:{}", login_id));
        if self.fail_login {
            return Err(BalanceError::api("S9999: login link expired"));
        }
        Ok(PayPayCredentials {
            device_uuid: "DEVICE-1".to_string(),
            client_uuid: "CLIENT-1".to_string(),
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
        })
    }

    async fn refresh_token(&mut self, refresh_token: &str) -> BalanceResult<()> {
        self.calls.push(format!("refresh:{}", refresh_token));
        if self.fail_refresh {
            return Err(BalanceError::auth("S0001: token expired"));
        }
        Ok(())
    }

    async fn get_balance(&self) -> BalanceResult<BalanceSnapshot> {
        Ok(BalanceSnapshot {
            all_balance: dec!(1545),
            usable_balance: dec!(1500),
            money_light: dec!(300),
            money: Some(dec!(1200)),
            point: dec!(45),
        })
    }

    async fn get_history(&self, size: u32) -> BalanceResult<Vec<Value>> {
        Ok((0..size).map(|i| json!({ "amount": i })).collect())
    }

    async fn get_point_history(&self) -> BalanceResult<Value> {
        Ok(self.point_history.clone())
    }
}

struct StubKeys {
    result: Option<ApiCredentials>,
}

#[async_trait]
impl ApiKeyProvider for StubKeys {
    async fn create_or_derive_api_credentials(&mut self) -> balance_polymarket::Result<ApiCredentials> {
        self.result
            .clone()
            .ok_or_else(|| ClobError::Api("Failed to derive API key: 401 Unauthorized".into()))
    }
}

struct StubSource;

#[async_trait]
impl AssetSource for StubSource {
    fn source(&self) -> Source {
        Source::Polymarket
    }

    async fn fetch_total(&self) -> BalanceResult<Decimal> {
        Ok(dec!(300))
    }

    async fn fetch_assets(&self) -> BalanceResult<Vec<Asset>> {
        Ok(vec![
            Asset::new("Cash", dec!(225)),
            Asset::new("Position", dec!(75)),
        ])
    }
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

// ============================================================================
// Account query
// ============================================================================

#[tokio::test]
async fn test_balance_prints_five_lines_in_order() {
    let mut api = StubPayPay::default();
    let mut out = Vec::new();

    flows::paypay_balance::run(&mut api, "refresh-0", false, &mut out)
        .await
        .unwrap();

    assert_eq!(output(out), "1545\n1500\n300\n1200\n45\n");
    assert_eq!(api.calls, vec!["refresh:refresh-0"]);
}

#[tokio::test]
async fn test_balance_with_investment_adds_sixth_line() {
    let mut api = StubPayPay::with_investment(880);
    let mut out = Vec::new();

    flows::paypay_balance::run(&mut api, "refresh-0", true, &mut out)
        .await
        .unwrap();

    let text = output(out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[5], "880");
}

#[tokio::test]
async fn test_missing_investment_key_is_fatal() {
    let mut api = StubPayPay {
        point_history: json!({ "payload": { "pointDetails": {} } }),
        ..StubPayPay::default()
    };
    let mut out = Vec::new();

    let err = flows::paypay_balance::run(&mut api, "refresh-0", true, &mut out)
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("payload.pointDetails.investmentAssets"));
}

#[tokio::test]
async fn test_refresh_failure_stops_before_query() {
    let mut api = StubPayPay {
        fail_refresh: true,
        ..StubPayPay::default()
    };
    let mut out = Vec::new();

    let err = flows::paypay_balance::run(&mut api, "refresh-0", false, &mut out)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("S0001"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_two_runs_print_the_same_output() {
    let mut api = StubPayPay::with_investment(10);

    let mut first = Vec::new();
    flows::paypay_balance::run(&mut api, "refresh-0", true, &mut first)
        .await
        .unwrap();
    let mut second = Vec::new();
    flows::paypay_balance::run(&mut api, "refresh-0", true, &mut second)
        .await
        .unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_prints_four_exports() {
    let mut api = StubPayPay::default();
    let mut input = Cursor::new(b"https://www.paypay.ne.jp/portal/oauth2/l?id=TK4602\n".to_vec());
    let mut prompt = Vec::new();
    let mut out = Vec::new();

    flows::paypay_login::run(&mut api, &mut input, &mut prompt, &mut out)
        .await
        .unwrap();

    assert_eq!(output(prompt), "Received ID: ");
    assert_eq!(
        output(out),
        "export PAYPAY_DEVICE_UUID=DEVICE-1\n\
         export PAYPAY_CLIENT_UUID=CLIENT-1\n\
         export PAYPAY_ACCESS_TOKEN=access-1\n\
         export PAYPAY_REFRESH_TOKEN=refresh-1\n"
    );
    assert_eq!(api.calls, vec!["login:TK4602"]);
}

#[tokio::test]
async fn test_login_accepts_bare_id() {
    let mut api = StubPayPay::default();
    let mut input = Cursor::new(b"TK4602\n".to_vec());
    let mut out = Vec::new();

    flows::paypay_login::run(&mut api, &mut input, &mut std::io::sink(), &mut out)
        .await
        .unwrap();

    assert_eq!(api.calls, vec!["login:TK4602"]);
}

#[tokio::test]
async fn test_login_rejects_blank_input() {
    let mut api = StubPayPay::default();
    let mut input = Cursor::new(b"\n".to_vec());
    let mut out = Vec::new();

    assert!(
        flows::paypay_login::run(&mut api, &mut input, &mut std::io::sink(), &mut out)
            .await
            .is_err()
    );
    assert!(api.calls.is_empty());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_login_rejects_id_with_path_characters() {
    let mut api = StubPayPay::default();
    let mut input = Cursor::new(b"../oauth2/token\n".to_vec());
    let mut out = Vec::new();

    assert!(
        flows::paypay_login::run(&mut api, &mut input, &mut std::io::sink(), &mut out)
            .await
            .is_err()
    );
    assert!(api.calls.is_empty());
}

#[tokio::test]
async fn test_login_error_propagates() {
    let mut api = StubPayPay {
        fail_login: true,
        ..StubPayPay::default()
    };
    let mut input = Cursor::new(b"TK4602\n".to_vec());
    let mut out = Vec::new();

    let err = flows::paypay_login::run(&mut api, &mut input, &mut std::io::sink(), &mut out)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("login link expired"));
    assert!(out.is_empty());
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_prints_json_array() {
    let mut api = StubPayPay::default();
    let mut out = Vec::new();

    flows::paypay_history::run(&mut api, "refresh-0", 3, &mut out)
        .await
        .unwrap();

    let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(api.calls, vec!["refresh:refresh-0"]);
}

// ============================================================================
// Polymarket credentials
// ============================================================================

#[tokio::test]
async fn test_api_keys_print_three_exports_with_quoted_secret() {
    let mut provider = StubKeys {
        result: Some(ApiCredentials {
            api_key: "key-1".to_string(),
            secret: "c2VjcmV0".to_string(),
            passphrase: "phrase-1".to_string(),
        }),
    };
    let mut out = Vec::new();

    flows::polymarket_keys::run(&mut provider, &mut out)
        .await
        .unwrap();

    assert_eq!(
        output(out),
        "export POLYMARKET_API_KEY=key-1\n\
         export POLYMARKET_API_SECRET=\"c2VjcmV0\"\n\
         export POLYMARKET_API_PASSPHRASE=phrase-1\n"
    );
}

#[tokio::test]
async fn test_api_key_failure_is_an_error() {
    let mut provider = StubKeys { result: None };
    let mut out = Vec::new();

    let err = flows::polymarket_keys::run(&mut provider, &mut out)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("401"));
    assert_eq!(balance_cli::exit_code_for(&err), balance_cli::exit_codes::FAILURE);
    assert!(out.is_empty());
}

// ============================================================================
// Assets
// ============================================================================

#[tokio::test]
async fn test_assets_print_json() {
    let mut out = Vec::new();

    flows::assets::run(&StubSource, &mut out).await.unwrap();

    let parsed: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed[0]["name"], "Cash");
    assert_eq!(parsed[1]["name"], "Position");
    assert!(parsed[0].get("bought").is_none());
}

#[test]
fn test_missing_env_names_the_variable() {
    let err = balance_core::require_env("BALANCE_CLI_TEST_UNSET_VARIABLE").unwrap_err();
    assert!(err.to_string().contains("BALANCE_CLI_TEST_UNSET_VARIABLE"));
    assert!(err.is_config());
}
