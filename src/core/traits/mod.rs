use async_trait::async_trait;

use crate::core::error::ProviderError;
use crate::core::types::{AdapterOutput, AdapterRequest, ProviderTag};

/// Provider adapter contract: one upstream call per invocation, normalized to
/// a common output shape.
///
/// Adapters hold their credential from construction and only report a missing
/// one when `invoke` is actually called.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider family this adapter serves, used for dispatch.
    fn provider(&self) -> ProviderTag;

    /// Sends a single non-streaming translation prompt upstream.
    async fn invoke(&self, req: &AdapterRequest) -> Result<AdapterOutput, ProviderError>;
}

/// Answers whether a credential for a provider is currently configured.
pub trait CredentialSource: Send + Sync {
    fn has_credential(&self, provider: ProviderTag) -> bool;
}
