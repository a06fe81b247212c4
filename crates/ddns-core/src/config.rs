//! Configuration types for the DDNS system
//!
//! The daemon reads its settings once at startup and hands them to each
//! collaborator as plain values. Nothing here touches the process environment.

use serde::{Deserialize, Serialize};

/// Default name.com API endpoint
pub const DEFAULT_PROVIDER_URL: &str = "https://api.name.com";

/// Default public IP lookup endpoint (plain-text response)
pub const DEFAULT_IP_SERVICE_URL: &str = "https://api.ipify.org?format=text";

/// Smallest TTL name.com accepts
pub const MIN_TTL: u32 = 300;

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// IP source configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// The single record this process manages
    pub record: RecordConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Build a configuration from the four required values, with defaults
    /// for everything else
    pub fn new(
        username: impl Into<String>,
        token: impl Into<String>,
        host: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            provider: ProviderConfig::new(username, token),
            ip_source: IpSourceConfig::default(),
            record: RecordConfig::new(host, domain),
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.ip_source.validate()?;
        self.record.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// DNS provider configuration
///
/// The `Debug` implementation never prints the API token.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider account username
    pub username: String,

    /// Provider API token
    /// ⚠️ NEVER log this value
    pub token: String,

    /// API base URL, without the `/v4` path
    #[serde(default = "default_provider_url")]
    pub base_url: String,

    /// Perform the list call but only log create/update payloads
    #[serde(default)]
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Create a live configuration against the public name.com API
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            base_url: default_provider_url(),
            dry_run: false,
        }
    }

    /// Point the provider at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.username.is_empty() {
            return Err(crate::Error::config("Provider username cannot be empty"));
        }
        if self.token.is_empty() {
            return Err(crate::Error::config("Provider API token cannot be empty"));
        }
        if self.base_url.is_empty() {
            return Err(crate::Error::config("Provider base URL cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("username", &self.username)
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

fn default_provider_url() -> String {
    DEFAULT_PROVIDER_URL.to_string()
}

/// Public IP lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourceConfig {
    /// URL returning the caller's IP as a plain-text body
    #[serde(default = "default_ip_service_url")]
    pub url: String,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("IP service URL cannot be empty"));
        }
        Ok(())
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_ip_service_url(),
        }
    }
}

fn default_ip_service_url() -> String {
    DEFAULT_IP_SERVICE_URL.to_string()
}

/// The managed DNS record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Subdomain label (e.g. "home"); empty for the zone apex
    pub host: String,

    /// Zone the record lives in (e.g. "example.com")
    pub domain: String,

    /// TTL used when the record has to be created
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl RecordConfig {
    /// Create a record configuration with the provider's minimum TTL
    pub fn new(host: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            domain: domain.into(),
            ttl: default_ttl(),
        }
    }

    /// Fully-qualified hostname, `host.domain`, or just `domain` at the apex
    pub fn fqdn(&self) -> String {
        if self.host.is_empty() {
            return self.domain.clone();
        }
        format!("{}.{}", self.host, self.domain)
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("Record domain cannot be empty"));
        }
        if self.ttl < MIN_TTL {
            return Err(crate::Error::config(format!(
                "Record TTL must be at least {} seconds. Got: {}",
                MIN_TTL, self.ttl
            )));
        }
        Ok(())
    }
}

fn default_ttl() -> u32 {
    MIN_TTL
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause between the end of one tick and the start of the next (in seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Capacity of the engine event channel
    ///
    /// When full, new events are dropped with a warning log.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Tick interval must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_interval_secs() -> u64 {
    10
}

fn default_event_channel_capacity() -> usize {
    100
}
