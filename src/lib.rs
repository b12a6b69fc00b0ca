pub mod api;
pub mod catalog;
pub mod config;
pub mod core;
pub mod gateway;
pub mod pricing;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod transport;
pub mod usage;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::core::error::{ConfigError, GatewayError, ProviderError, QuotaError};
pub use crate::core::types::*;
pub use gateway::{TranslationGateway, TranslationGatewayBuilder};
