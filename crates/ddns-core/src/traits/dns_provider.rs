// # DNS Provider Trait
//
// Defines the interface for reading and writing DNS records via provider APIs.
//
// ## Implementations
//
// - name.com v4: `ddns-provider-namecom` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, DnsRecord};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_records("example.com").await?;
//     if !records.iter().any(|r| r.is_a_record_for("home")) {
//         provider
//             .create_record("example.com", &DnsRecord::a("home", "203.0.113.7", 300))
//             .await?;
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The only record type this system manages
pub const RECORD_TYPE_A: &str = "A";

/// One provider-side DNS resource record
///
/// Field names follow the provider wire format. `id` is assigned by the
/// provider and is absent for records that have not been created yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Subdomain label; empty for the zone apex
    #[serde(default)]
    pub host: String,

    /// Record type ("A", "AAAA", "CNAME", ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record value; an IP address for `A` records
    #[serde(default)]
    pub answer: String,

    /// Time-to-live in seconds
    #[serde(default)]
    pub ttl: u32,
}

impl DnsRecord {
    /// Build a new, not yet created `A` record
    pub fn a(host: impl Into<String>, answer: impl Into<String>, ttl: u32) -> Self {
        Self {
            id: None,
            host: host.into(),
            record_type: RECORD_TYPE_A.to_string(),
            answer: answer.into(),
            ttl,
        }
    }

    /// Whether this is the `A` record for `host`
    pub fn is_a_record_for(&self, host: &str) -> bool {
        self.host == host && self.record_type == RECORD_TYPE_A
    }

    /// Copy of this record pointing at a new answer
    pub fn with_answer(&self, answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..self.clone()
        }
    }
}

/// Trait for DNS provider implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// Providers are single-shot: every method performs exactly one API call and
/// reports success or failure. They never retry, cache, or decide whether a
/// write is needed; that is the reconciler's job.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record in `domain`, in the order the provider returns them
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: The records (possibly empty)
    /// - `Err(Error)`: Transport failure, unsuccessful status or undecodable body
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create `record` in `domain`
    ///
    /// The record's `id` is ignored.
    async fn create_record(&self, domain: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Replace the record identified by `record.id` in `domain`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update
    /// - `Err(Error)`: The record has no `id`, or the call failed
    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;

    /// Whether create/update calls are only logged, not sent
    fn is_dry_run(&self) -> bool {
        false
    }
}
