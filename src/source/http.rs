// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST implementation of [`DeviceSource`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::device::{Attributes, DeviceId};
use crate::error::{ParseError, ProtocolError};

use super::DeviceSource;

/// Header carrying the session API key.
const API_KEY_HEADER: &str = "ABODE-API-KEY";

const DEVICES_PATH: &str = "/api/v1/devices";
const PANEL_PATH: &str = "/api/v1/panel";

// ============================================================================
// HttpConfig
// ============================================================================

/// Connection parameters for the REST service.
///
/// Session establishment is out of scope: the API key and access token of an
/// existing session are supplied here.
///
/// # Examples
///
/// ```
/// use abode_lib::source::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new()
///     .with_api_key("key")
///     .with_access_token("token")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), HttpConfig::DEFAULT_BASE_URL);
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    base_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
    timeout: Duration,
}

impl HttpConfig {
    /// Default service root.
    pub const DEFAULT_BASE_URL: &'static str = "https://my.goabode.com";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration pointing at the default service root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            access_token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the service root, e.g. for a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the session API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the OAuth access token.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the service root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an [`HttpClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidAddress`] if the base URL is not an
    /// http(s) URL, or [`ProtocolError::Http`] if the client cannot be built.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            client,
            api_key: self.api_key,
            access_token: self.access_token,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// REST client fetching device and panel snapshots.
///
/// # Examples
///
/// ```no_run
/// use abode_lib::source::{DeviceSource, HttpConfig};
///
/// # async fn example() -> abode_lib::Result<()> {
/// let client = HttpConfig::new()
///     .with_api_key("key")
///     .with_access_token("token")
///     .into_client()?;
/// let devices = client.fetch_devices().await?;
/// println!("{} devices", devices.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl HttpClient {
    /// Returns the service root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of a single device.
    fn device_url(&self, device_id: &DeviceId) -> String {
        format!(
            "{}{DEVICES_PATH}/{}",
            self.base_url,
            urlencoding::encode(device_id.as_str())
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json(&self, url: &str) -> crate::Result<Value> {
        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProtocolError::AuthenticationFailed.into());
        }
        if !status.is_success() {
            return Err(ProtocolError::RequestFailed(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ))
            .into());
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;
        tracing::trace!(body = %body, "Received HTTP response");

        Ok(serde_json::from_str(&body).map_err(ParseError::from)?)
    }
}

/// Unwraps an object payload, or a one-element list holding one.
fn into_object(value: Value) -> Result<Attributes, ParseError> {
    match value {
        Value::Object(object) => Ok(object),
        Value::Array(mut items) if items.len() == 1 => into_object(items.remove(0)),
        other => Err(ParseError::UnexpectedFormat(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn into_object_list(value: Value) -> Result<Vec<Attributes>, ParseError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(object),
                other => Err(ParseError::UnexpectedFormat(format!(
                    "expected a device object, got {other}"
                ))),
            })
            .collect(),
        other => Err(ParseError::UnexpectedFormat(format!(
            "expected a device list, got {other}"
        ))),
    }
}

impl DeviceSource for HttpClient {
    async fn fetch_devices(&self) -> crate::Result<Vec<Attributes>> {
        let url = format!("{}{DEVICES_PATH}", self.base_url);
        let devices = into_object_list(self.get_json(&url).await?)?;
        tracing::debug!(count = devices.len(), "Fetched device list");
        Ok(devices)
    }

    async fn fetch_device(&self, device_id: &DeviceId) -> crate::Result<Attributes> {
        let url = self.device_url(device_id);
        Ok(into_object(self.get_json(&url).await?)?)
    }

    async fn fetch_panel(&self) -> crate::Result<Attributes> {
        let url = format!("{}{PANEL_PATH}", self.base_url);
        Ok(into_object(self.get_json(&url).await?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_url_is_encoded() {
        let client = HttpConfig::new()
            .with_base_url("http://localhost:8080/")
            .into_client()
            .unwrap();
        assert_eq!(
            client.device_url(&DeviceId::from("ZW:0000000a")),
            "http://localhost:8080/api/v1/devices/ZW%3A0000000a"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = HttpConfig::new()
            .with_base_url("my.goabode.com")
            .into_client()
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidAddress(_)));
    }

    #[test]
    fn single_element_list_is_unwrapped() {
        let object = into_object(json!([{"id": "RF:1"}])).unwrap();
        assert_eq!(object["id"], "RF:1");
        assert!(into_object(json!([])).is_err());
        assert!(into_object(json!("nope")).is_err());
    }

    #[test]
    fn device_list_must_hold_objects() {
        assert_eq!(into_object_list(json!([{"id": "a"}, {"id": "b"}])).unwrap().len(), 2);
        assert!(into_object_list(json!([1, 2])).is_err());
        assert!(into_object_list(json!({"id": "a"})).is_err());
    }

    #[test]
    fn config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), HttpConfig::DEFAULT_TIMEOUT);
        assert_eq!(config.base_url(), "https://my.goabode.com");
    }
}
