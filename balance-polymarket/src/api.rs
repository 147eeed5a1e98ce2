//! Capability interface for obtaining CLOB API credentials

use async_trait::async_trait;

use crate::types::{ApiCredentials, Result};

#[async_trait]
pub trait ApiKeyProvider: Send + Sync {
    /// Create new API credentials, or derive the existing ones if creation fails
    async fn create_or_derive_api_credentials(&mut self) -> Result<ApiCredentials>;
}
