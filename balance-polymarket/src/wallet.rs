//! Signing wallet - loading from a private key and signing

use alloy::primitives::{Address, B256};
use alloy::signers::Signer;
use alloy::signers::local::PrivateKeySigner;
use balance_core::require_env;
use std::str::FromStr;
use tracing::info;

use crate::types::{ClobError, Result};

/// Environment variable holding the wallet private key
pub const PRIVATE_KEY_ENV: &str = "POLYMARKET_PRIVATE_KEY";

/// Wallet used to authenticate against the Polymarket CLOB
#[derive(Clone)]
pub struct TradingWallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl TradingWallet {
    /// Create a new wallet from a private key hex string
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let key_bytes = B256::from_str(key)
            .map_err(|e| ClobError::Wallet(format!("Invalid private key format: {}", e)))?;

        let signer = PrivateKeySigner::from_bytes(&key_bytes)
            .map_err(|e| ClobError::Wallet(format!("Failed to create signer: {}", e)))?;

        let address = signer.address();

        info!("Loaded wallet: {}", address);

        Ok(Self { signer, address })
    }

    /// Load wallet from environment variable POLYMARKET_PRIVATE_KEY
    pub fn from_env() -> Result<Self> {
        let private_key = require_env(PRIVATE_KEY_ENV)?;
        Self::from_private_key(&private_key)
    }

    /// Get the wallet address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the wallet address as a checksummed string
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Sign a message hash directly
    pub async fn sign_hash(&self, hash: B256) -> Result<alloy::signers::Signature> {
        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| ClobError::Signing(format!("Failed to sign hash: {}", e)))
    }
}

impl std::fmt::Debug for TradingWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingWallet")
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = TradingWallet::from_private_key(TEST_KEY).unwrap();
        assert_eq!(
            wallet.address_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_accepts_unprefixed_key() {
        let wallet = TradingWallet::from_private_key(&TEST_KEY[2..]).unwrap();
        assert_eq!(
            wallet.address(),
            TradingWallet::from_private_key(TEST_KEY).unwrap().address()
        );
    }

    #[test]
    fn test_invalid_key_is_wallet_error() {
        let err = TradingWallet::from_private_key("0x1234").unwrap_err();
        assert!(matches!(err, ClobError::Wallet(_)));
    }

    #[tokio::test]
    async fn test_sign_hash() {
        let wallet = TradingWallet::from_private_key(TEST_KEY).unwrap();
        let signature = wallet.sign_hash(B256::ZERO).await.unwrap();

        // Signature should be 65 bytes (r: 32, s: 32, v: 1)
        assert_eq!(signature.as_bytes().len(), 65);
    }
}
