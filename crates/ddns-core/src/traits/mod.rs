//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces the reconciler talks to.
//!
//! - [`DnsProvider`]: List, create and update provider records
//! - [`IpSource`]: Observe the current public IP

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsRecord, RECORD_TYPE_A};
