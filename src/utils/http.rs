// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ClientConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))
}

/// GET a URL and return the body of a 2xx response.
///
/// Transport failures map to `Network`, other statuses to `HttpStatus`.
pub async fn fetch_bytes(client: &reqwest::Client, url: &Url) -> Result<Vec<u8>> {
    log::debug!("GET {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| AppError::network(url.as_str(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::network(url.as_str(), e))?;
    Ok(body.to_vec())
}

/// GET a URL and decode the JSON body.
pub async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: &Url) -> Result<T> {
    let body = fetch_bytes(client, url).await?;
    decode_json(url.as_str(), &body)
}

/// Decode a JSON body, tagging failures with the request it came from.
pub fn decode_json<T: DeserializeOwned>(context: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| AppError::decode(context, e))
}
