use std::time::Duration;

use reqwest::Response;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::{ConfigError, ProviderError};
use crate::core::types::ProviderTag;

const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

/// Single-shot JSON-over-HTTP client shared by provider adapters. No retries:
/// a failed call surfaces immediately to the caller.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> Result<Self, ConfigError> {
        Self::with_client(reqwest::Client::new(), timeout_ms)
    }

    pub fn with_client(client: reqwest::Client, timeout_ms: u64) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_ms });
        }

        Ok(Self { client, timeout_ms })
    }

    pub async fn post_json<TReq, TResp>(
        &self,
        provider: ProviderTag,
        model: &str,
        url: &str,
        headers: HeaderMap,
        body: &TReq,
    ) -> Result<TResp, ProviderError>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        debug!(%provider, model, url, "sending provider request");

        let response = self
            .client
            .post(url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|error| ProviderError::Transport {
                provider,
                model: Some(model.to_string()),
                message: error.to_string(),
            })?;

        let status_code = response.status().as_u16();
        let request_id = extract_request_id(response.headers());

        if !response.status().is_success() {
            debug!(%provider, model, status_code, "provider returned error status");
            return Err(
                build_status_error(provider, model, status_code, request_id, response).await,
            );
        }

        response
            .json::<TResp>()
            .await
            .map_err(|error| ProviderError::Serialization {
                provider,
                model: Some(model.to_string()),
                message: error.to_string(),
            })
    }
}

pub fn bearer_headers(provider: ProviderTag, api_key: &str) -> Result<HeaderMap, ProviderError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        header_value(provider, &format!("Bearer {api_key}"))?,
    );
    Ok(headers)
}

pub fn insert_header(
    headers: &mut HeaderMap,
    provider: ProviderTag,
    name: &'static str,
    value: &str,
) -> Result<(), ProviderError> {
    headers.insert(
        HeaderName::from_static(name),
        header_value(provider, value)?,
    );
    Ok(())
}

fn header_value(provider: ProviderTag, value: &str) -> Result<HeaderValue, ProviderError> {
    HeaderValue::from_str(value).map_err(|error| ProviderError::Protocol {
        provider,
        model: None,
        message: format!("invalid header value: {error}"),
    })
}

async fn build_status_error(
    provider: ProviderTag,
    model: &str,
    status_code: u16,
    request_id: Option<String>,
    response: Response,
) -> ProviderError {
    let message = match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => format!("http status {status_code}"),
        Err(error) => format!("http status {status_code}; failed to read response body: {error}"),
    };

    ProviderError::Status {
        provider,
        model: Some(model.to_string()),
        status_code,
        request_id,
        message,
    }
}

fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    ["request-id", DEFAULT_REQUEST_ID_HEADER]
        .into_iter()
        .find_map(|name| headers.get(name))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
