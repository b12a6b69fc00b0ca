use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::QuotaError;
use crate::core::types::{ProviderTag, TranslationResult};

/// Subscription tier of the calling account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Pro,
    Enterprise,
}

impl Tier {
    /// Token allowance per billing period; `None` is unlimited.
    pub fn token_limit(self) -> Option<u64> {
        match self {
            Self::Free => Some(10_000),
            Self::Pro => Some(500_000),
            Self::Enterprise => None,
        }
    }
}

/// Identity resolved by the caller's auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    pub account_id: String,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub account_id: String,
    pub model: String,
    pub provider: ProviderTag,
    pub tokens_used: u64,
    pub cost: f64,
}

impl UsageRecord {
    pub fn from_result(account_id: &str, model: &str, result: &TranslationResult) -> Self {
        Self {
            account_id: account_id.to_string(),
            model: model.to_string(),
            provider: result.provider,
            tokens_used: result.tokens_used,
            cost: result.cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountUsage {
    pub requests: u64,
    pub tokens_used: u64,
    pub cost: f64,
}

/// Pre-call quota gate, owned by the caller.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn check(&self, account: &AccountContext) -> Result<(), QuotaError>;
}

/// Post-call usage sink, owned by the caller.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, record: UsageRecord);
}

/// Process-local ledger. Increments for one account are applied under a single
/// lock so concurrent requests never undercount.
#[derive(Debug, Default)]
pub struct InMemoryUsageLedger {
    accounts: Mutex<HashMap<String, AccountUsage>>,
}

impl InMemoryUsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(&self, account_id: &str) -> AccountUsage {
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(account_id)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuotaStore for InMemoryUsageLedger {
    async fn check(&self, account: &AccountContext) -> Result<(), QuotaError> {
        let Some(limit) = account.tier.token_limit() else {
            return Ok(());
        };

        let used = self.usage(&account.account_id).tokens_used;
        if used >= limit {
            return Err(QuotaError::Exceeded {
                account: account.account_id.clone(),
                limit,
                used,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UsageSink for InMemoryUsageLedger {
    async fn record(&self, record: UsageRecord) {
        let mut accounts = self
            .accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = accounts.entry(record.account_id).or_default();
        entry.requests += 1;
        entry.tokens_used += record.tokens_used;
        entry.cost += record.cost;
    }
}
