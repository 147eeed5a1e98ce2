//! EIP-712 typed data signing for Polymarket L1 authentication
//!
//! The CLOB accepts a `ClobAuth` signature as proof of wallet ownership
//! when creating or deriving API keys.

use alloy::primitives::U256;
use alloy::sol;
use alloy::sol_types::{SolStruct, eip712_domain};

use crate::types::Result;
use crate::wallet::TradingWallet;

/// The fixed message for CLOB auth
const CLOB_AUTH_MESSAGE: &str = "This message attests that I control the given wallet";

// IMPORTANT: Alloy's sol! macro allows "address address;" syntax which produces
// the correct EIP-712 type hash "ClobAuth(address address,string timestamp,uint256 nonce,string message)"
sol! {
    struct ClobAuth {
        address address;
        string timestamp;
        uint256 nonce;
        string message;
    }
}

/// Get the EIP-712 domain for ClobAuth on the given chain
fn clob_auth_domain(chain_id: u64) -> alloy::sol_types::Eip712Domain {
    eip712_domain! {
        name: "ClobAuthDomain",
        version: "1",
        chain_id: chain_id,
    }
}

impl TradingWallet {
    /// Sign an L1 authentication message using EIP-712 typed data
    ///
    /// Used for creating or deriving API keys.
    pub async fn sign_l1_auth(&self, timestamp: u64, nonce: u64, chain_id: u64) -> Result<String> {
        let clob_auth = ClobAuth {
            address: self.address(),
            timestamp: timestamp.to_string(),
            nonce: U256::from(nonce),
            message: CLOB_AUTH_MESSAGE.to_string(),
        };

        let signing_hash = clob_auth.eip712_signing_hash(&clob_auth_domain(chain_id));
        tracing::debug!("L1 auth signing hash: 0x{}", hex::encode(signing_hash));

        let signature = self.sign_hash(signing_hash).await?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

/// Get current timestamp in seconds
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::POLYGON_CHAIN_ID;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_sign_l1_auth() {
        let wallet = TradingWallet::from_private_key(TEST_KEY).unwrap();

        let signature = wallet
            .sign_l1_auth(1700000000, 0, POLYGON_CHAIN_ID)
            .await
            .unwrap();
        assert!(signature.starts_with("0x"));
        // 65 bytes = 130 hex chars + "0x" prefix
        assert_eq!(signature.len(), 132);
    }

    #[tokio::test]
    async fn test_l1_signature_is_deterministic() {
        let wallet = TradingWallet::from_private_key(TEST_KEY).unwrap();
        let a = wallet.sign_l1_auth(1700000000, 0, POLYGON_CHAIN_ID).await.unwrap();
        let b = wallet.sign_l1_auth(1700000000, 0, POLYGON_CHAIN_ID).await.unwrap();
        assert_eq!(a, b);

        let other_chain = wallet.sign_l1_auth(1700000000, 0, 80002).await.unwrap();
        assert_ne!(a, other_chain);
    }

    #[test]
    fn test_domain_binds_chain() {
        let domain = clob_auth_domain(POLYGON_CHAIN_ID);
        assert_eq!(domain.chain_id, Some(U256::from(POLYGON_CHAIN_ID)));
    }
}
