//! HTTP client for the MeasureSoftGram service.
//!
//! Every call carries `Content-Type: application/json` and the service token,
//! and is bounded by a single timeout long enough for a cold-starting backend.
//! Transport failures are logged here and surface as [`MsgramError::NoData`];
//! non-2xx answers surface as [`MsgramError::Status`]. Nothing is retried.

use crate::error::{MsgramError, Result};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

/// Waits out a sleeping Heroku dyno.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(50);

/// Settings for one run's [`RemoteClient`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Service token. Sent as `Bearer <token>` unless it already names a scheme.
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RemoteClient {
    http: Client,
}

impl RemoteClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match authorization_value(&config.token) {
            Some(value) => {
                let mut value = HeaderValue::from_str(&value)
                    .context("MSGram service token is not a valid header value")?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => tracing::warn!("No MSGram service token configured; requests are anonymous"),
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to build MSGram HTTP client")?;

        Ok(Self { http })
    }

    /// Performs one request and returns the decoded JSON payload.
    ///
    /// A `POST` without a body sends `{}`.
    pub async fn request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value> {
        let verb = if method == Method::GET { "get" } else { "post" };
        let mut request = self.http.request(method.clone(), url);
        if method == Method::POST {
            let empty = Value::Object(Map::new());
            request = request.json(body.unwrap_or(&empty));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url, error = %e, "Failed to {} data to the API", verb);
                return Err(MsgramError::NoData);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(url, status = status.as_u16(), "API rejected the {} request", verb);
            return Err(MsgramError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(url, error = %e, "Failed to read the API response body");
                return Err(MsgramError::NoData);
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::error!(url, status = status.as_u16(), "API response has no body");
            return Err(MsgramError::NoData);
        }

        let payload: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(url, error = %e, "API response is not JSON");
            MsgramError::NoData
        })?;

        if payload.is_null() {
            return Err(MsgramError::NoData);
        }

        tracing::info!(
            url,
            status = status.as_u16(),
            "Data {}",
            if method == Method::GET { "received" } else { "sent" }
        );
        Ok(payload)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let payload = self.request(Method::GET, url, None).await?;
        decode(url, payload)
    }

    pub async fn post<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        let payload = self.request(Method::POST, url, Some(body)).await?;
        decode(url, payload)
    }
}

fn decode<T: DeserializeOwned>(url: &str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| {
        tracing::error!(url, error = %e, "API response has an unexpected shape");
        MsgramError::NoData
    })
}

/// Builds the `Authorization` value, or `None` for an empty token.
fn authorization_value(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else if token.contains(char::is_whitespace) {
        Some(token.to_string())
    } else {
        Some(format!("Bearer {token}"))
    }
}
