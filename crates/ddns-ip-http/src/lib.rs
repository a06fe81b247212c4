// # HTTP IP Source
//
// This crate provides an HTTP-based public IP source for the DDNS system.
//
// ## Architecture
//
// Each call to `current()` performs one GET against a "what is my IP"
// service (e.g. api.ipify.org, ifconfig.me, icanhazip.com) and returns the
// plain-text body. Nothing is cached between calls and the address is not
// parsed; the provider stores whatever the service reports.

use ddns_core::config::IpSourceConfig;
use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::time::Duration;

/// Default HTTP timeout for lookups
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP-based public IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL returning the caller's IP as plain text
    ///   (e.g., "https://api.ipify.org?format=text")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.url.clone())
    }

    /// The lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response from {}: {}", self.url, e)))?;

        if !status.is_success() {
            return Err(Error::ip_source(format!(
                "Unexpected status code {} while looking up own ip: {}",
                status, body
            )));
        }

        // Some services terminate the address with a newline; nothing else is stripped
        let ip = body
            .strip_suffix("\r\n")
            .or_else(|| body.strip_suffix('\n'))
            .unwrap_or(&body)
            .to_string();
        tracing::debug!("Observed public IP {} via {}", ip, self.url);

        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
