//! Capability interface over the PayPay mobile API
//!
//! The CLI flows only talk to PayPay through this trait, so they can be
//! driven by a stub in tests.

use async_trait::async_trait;
use balance_core::BalanceResult;
use serde_json::Value;

use crate::types::{BalanceSnapshot, PayPayCredentials};

#[async_trait]
pub trait PayPayApi: Send + Sync {
    /// Exchange a one-time login id for long-lived credentials
    async fn login(&mut self, login_id: &str) -> BalanceResult<PayPayCredentials>;

    /// Swap the refresh token for a fresh access token
    async fn refresh_token(&mut self, refresh_token: &str) -> BalanceResult<()>;

    /// Read the wallet balances
    async fn get_balance(&self) -> BalanceResult<BalanceSnapshot>;

    /// Read the most recent `size` balance history entries
    async fn get_history(&self, size: u32) -> BalanceResult<Vec<Value>>;

    /// Read the point history, including the response envelope
    async fn get_point_history(&self) -> BalanceResult<Value>;
}
