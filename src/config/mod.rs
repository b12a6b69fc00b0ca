use crate::core::error::ConfigError;
use crate::core::traits::CredentialSource;
use crate::core::types::ProviderTag;

pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const GOOGLE_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPEN_SOURCE_DEFAULT_BASE_URL: &str = "https://api.together.xyz";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const TIMEOUT_ENV: &str = "TRANSLATION_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl ProviderSettings {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: sanitize_api_key(api_key),
            base_url: base_url.into(),
        }
    }
}

/// Explicit configuration snapshot every collaborator is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub google: ProviderSettings,
    pub open_source: ProviderSettings,
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::new(None, OPENAI_DEFAULT_BASE_URL),
            anthropic: ProviderSettings::new(None, ANTHROPIC_DEFAULT_BASE_URL),
            google: ProviderSettings::new(None, GOOGLE_DEFAULT_BASE_URL),
            open_source: ProviderSettings::new(None, OPEN_SOURCE_DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the snapshot from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for provider in ProviderTag::ALL {
            let api_key = env_keys(provider)
                .iter()
                .find_map(|key| sanitize_api_key(lookup(key)));
            let settings = config.settings_mut(provider);
            settings.api_key = api_key;
            if let Some(base_url) = lookup(base_url_key(provider)) {
                let trimmed = base_url.trim();
                if !trimmed.is_empty() {
                    settings.base_url = trimmed.to_string();
                }
            }
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout_ms =
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidEnvValue {
                        key: TIMEOUT_ENV.to_string(),
                        value: raw.clone(),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                timeout_ms: self.timeout_ms,
            });
        }

        for provider in ProviderTag::ALL {
            let base_url = &self.settings(provider).base_url;
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(ConfigError::InvalidBaseUrl {
                    provider,
                    reason: format!("expected http(s) url, got {base_url:?}"),
                });
            }
        }

        Ok(())
    }

    pub fn settings(&self, provider: ProviderTag) -> &ProviderSettings {
        match provider {
            ProviderTag::Openai => &self.openai,
            ProviderTag::Anthropic => &self.anthropic,
            ProviderTag::Google => &self.google,
            ProviderTag::OpenSource => &self.open_source,
        }
    }

    fn settings_mut(&mut self, provider: ProviderTag) -> &mut ProviderSettings {
        match provider {
            ProviderTag::Openai => &mut self.openai,
            ProviderTag::Anthropic => &mut self.anthropic,
            ProviderTag::Google => &mut self.google,
            ProviderTag::OpenSource => &mut self.open_source,
        }
    }

    pub fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials {
            configured: ProviderTag::ALL
                .into_iter()
                .filter(|provider| self.settings(*provider).api_key.is_some())
                .collect(),
        }
    }
}

/// Credential presence captured once from a [`GatewayConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderCredentials {
    configured: Vec<ProviderTag>,
}

impl ProviderCredentials {
    pub fn with(providers: impl IntoIterator<Item = ProviderTag>) -> Self {
        let mut configured = Vec::new();
        for provider in providers {
            if !configured.contains(&provider) {
                configured.push(provider);
            }
        }
        Self { configured }
    }
}

impl CredentialSource for ProviderCredentials {
    fn has_credential(&self, provider: ProviderTag) -> bool {
        self.configured.contains(&provider)
    }
}

/// Re-reads the process environment on every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn has_credential(&self, provider: ProviderTag) -> bool {
        env_keys(provider)
            .iter()
            .any(|key| sanitize_api_key(std::env::var(key).ok()).is_some())
    }
}

pub fn env_keys(provider: ProviderTag) -> &'static [&'static str] {
    match provider {
        ProviderTag::Openai => &["OPENAI_API_KEY"],
        ProviderTag::Anthropic => &["ANTHROPIC_API_KEY"],
        ProviderTag::Google => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
        ProviderTag::OpenSource => &["OPEN_SOURCE_API_KEY"],
    }
}

fn base_url_key(provider: ProviderTag) -> &'static str {
    match provider {
        ProviderTag::Openai => "OPENAI_BASE_URL",
        ProviderTag::Anthropic => "ANTHROPIC_BASE_URL",
        ProviderTag::Google => "GOOGLE_BASE_URL",
        ProviderTag::OpenSource => "OPEN_SOURCE_BASE_URL",
    }
}

pub(crate) fn sanitize_api_key(api_key: Option<String>) -> Option<String> {
    api_key.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
