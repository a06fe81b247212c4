// # ddns-core
//
// Core library for the dynamic DNS updater.
//
// ## Architecture Overview
//
// The updater keeps one `A` record at a DNS provider in line with the
// caller's public IP address:
// - **DnsProvider**: Trait for listing, creating and updating provider records
// - **IpSource**: Trait for observing the current public IP
// - **DdnsEngine**: The reconciler that runs one lookup → observe → converge
//   tick on a fixed interval
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation logic is separate from HTTP code
// 2. **Stateless Ticks**: Every tick re-reads the provider; nothing is cached
// 3. **Explicit Configuration**: Collaborators receive their settings as values
// 4. **Library-First**: The reconciler can be embedded and driven by tests

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsProvider, DnsRecord, IpSource};
pub use engine::{DdnsEngine, EngineEvent, TickStage};
pub use config::{DdnsConfig, EngineConfig, IpSourceConfig, ProviderConfig, RecordConfig};
pub use error::{Error, Result};
