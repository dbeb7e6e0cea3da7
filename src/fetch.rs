//! JSON over HTTP GET.
//!
//! One request per call: no retry, no cancellation. Only a 200 response is
//! decoded; every other status is reported as [`FetchError::Status`].

use crate::config::HttpConfig;
use crate::error::FetchError;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JsonClient {
    client: reqwest::Client,
}

impl JsonClient {
    pub fn new(config: &HttpConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| {
                tracing::warn!(url, error = %source, "request failed");
                FetchError::Transport {
                    url: url.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url, %status, "unexpected status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(url, error = %source, "response is not the expected JSON");
            FetchError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}

impl Default for JsonClient {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}
