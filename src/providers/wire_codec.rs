use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::types::{AdapterOutput, AdapterRequest};

/// Provider-layer wire contract.
///
/// `ProviderAdapter` owns credentials and transport; a codec only maps the
/// normalized adapter request to the provider's JSON body and the provider's
/// JSON response back to an `AdapterOutput`.
pub(crate) trait WireCodec {
    fn encode_request(&self, req: &AdapterRequest) -> Value;

    fn decode_response(
        &self,
        req: &AdapterRequest,
        body: &Value,
    ) -> Result<AdapterOutput, ProviderError>;
}

/// Joins system and user prompts for wire formats without a system role.
pub(crate) fn combined_prompt(req: &AdapterRequest) -> String {
    format!("{}\n\n{}", req.system_prompt, req.user_prompt)
}
