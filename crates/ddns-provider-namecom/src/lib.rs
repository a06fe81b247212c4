// # name.com DNS Provider
//
// This crate provides a name.com DNS provider implementation for the DDNS system.
//
// ## Behaviour
//
// - One HTTP request per trait call
// - Errors are returned to the engine, never retried here
// - HTTP timeout configured (30 seconds)
// - HTTP basic auth (username + API token) on every request
// - Dry-run mode: list requests are real, create/update payloads are only logged
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if username or token is empty
//
// ## API Reference
//
// - name.com API v4: https://www.name.com/api-docs
// - List Records:  GET  `/v4/domains/:domain/records`
// - Create Record: POST `/v4/domains/:domain/records`
// - Update Record: PUT  `/v4/domains/:domain/records/:id`

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::traits::{DnsProvider, DnsRecord};
use ddns_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "namecom";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply body of the list-records call
///
/// name.com omits `records` entirely for a zone without records.
#[derive(Debug, Deserialize)]
struct ListRecordsReply {
    #[serde(default)]
    records: Vec<DnsRecord>,
}

/// name.com DNS provider
///
/// Stateless and single-shot. Each call builds one request, authenticated
/// with the configured username and token.
pub struct NameComProvider {
    /// Account username
    username: String,

    /// API token
    /// ⚠️ NEVER log this value
    token: String,

    /// API root, e.g. `https://api.name.com`
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform list requests but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for NameComProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameComProvider")
            .field("username", &self.username)
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl NameComProvider {
    /// Create a new name.com provider
    ///
    /// # Returns
    ///
    /// - `Ok(NameComProvider)`: Ready to use
    /// - `Err(Error::Config)`: Missing username/token or HTTP client setup failed
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if config.dry_run {
            tracing::warn!("name.com provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            username: config.username.clone(),
            token: config.token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            dry_run: config.dry_run,
        })
    }

    fn records_url(&self, domain: &str) -> String {
        format!("{}/v4/domains/{}/records", self.base_url, domain)
    }

    fn record_url(&self, domain: &str, id: i64) -> String {
        format!("{}/{}", self.records_url(domain), id)
    }

    /// Send an authenticated request and require a successful status
    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> Result<reqwest::Response> {
        let response = request
            .basic_auth(&self.username, Some(&self.token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed while {}: {}", action, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "Invalid username/token or insufficient permissions while {}. Status: {}",
                action, status
            )),
            500..=599 => Error::provider(
                PROVIDER_NAME,
                format!("name.com server error while {}: {} - {}", action, status, error_text),
            ),
            _ => Error::provider(
                PROVIDER_NAME,
                format!("Unexpected status code {} while {}: {}", status, action, error_text),
            ),
        })
    }
}

#[async_trait]
impl DnsProvider for NameComProvider {
    /// # API Call
    ///
    /// ```http
    /// GET /v4/domains/:domain/records
    /// Authorization: Basic <username:token>
    /// ```
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let url = self.records_url(domain);
        tracing::debug!("Listing records for {}", domain);

        let response = self
            .send(self.client.get(&url), "listing dns records")
            .await?;

        let reply: ListRecordsReply = response.json().await.map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                format!("Could not decode the reply while listing records: {}", e),
            )
        })?;

        Ok(reply.records)
    }

    /// # API Call
    ///
    /// ```http
    /// POST /v4/domains/:domain/records
    /// {"host": "home", "type": "A", "answer": "203.0.113.7", "ttl": 300}
    /// ```
    async fn create_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        let record = DnsRecord {
            id: None,
            ..record.clone()
        };
        let body = serde_json::to_vec(&record)?;
        let url = self.records_url(domain);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                url,
                String::from_utf8_lossy(&body)
            );
            return Ok(());
        }

        self.send(self.client.post(&url).body(body), "creating dns record")
            .await?;

        Ok(())
    }

    /// # API Call
    ///
    /// ```http
    /// PUT /v4/domains/:domain/records/:id
    /// {"id": 42, "host": "home", "type": "A", "answer": "203.0.113.8", "ttl": 300}
    /// ```
    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        let id = record.id.ok_or_else(|| {
            Error::invalid_input(format!(
                "Cannot update record '{}' without a provider id",
                record.host
            ))
        })?;
        let body = serde_json::to_vec(record)?;
        let url = self.record_url(domain, id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                String::from_utf8_lossy(&body)
            );
            return Ok(());
        }

        self.send(self.client.put(&url).body(body), "updating dns record")
            .await?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
