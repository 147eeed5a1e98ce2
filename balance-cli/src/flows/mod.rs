//! Command flows
//!
//! Every flow either fully succeeds or returns the first error unchanged.

pub mod assets;
pub mod paypay_balance;
pub mod paypay_history;
pub mod paypay_login;
pub mod polymarket_keys;
