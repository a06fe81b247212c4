//! Core DDNS engine
//!
//! The DdnsEngine is the reconciler. On every tick it:
//! - Looks up the managed `A` record via DnsProvider
//! - Observes the current public IP via IpSource
//! - Creates or updates the record when it is missing or stale
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────┐
//!                  │  DdnsEngine  │──── EngineEvent ───▶ (monitoring)
//!                  └──────────────┘
//!                     │        │
//!        ┌────────────┘        └────────────┐
//!        ▼                                  ▼
//! ┌─────────────┐                    ┌─────────────┐
//! │ DnsProvider │                    │  IpSource   │
//! │ list/create │                    │  current()  │
//! │   /update   │                    └─────────────┘
//! └─────────────┘
//! ```
//!
//! ## Tick Flow
//!
//! 1. List records, pick the first `A` record for the configured host
//! 2. Fetch the current public IP
//! 3. Absent → create; stale → update; equal → nothing
//!
//! Any failure ends the tick after an error log. The next tick starts from
//! scratch, so the engine holds no state between ticks.
//!
//! A dry-run provider accepts writes without sending them. Those ticks log a
//! `[DRY-RUN]` line and emit no created/updated event.

use crate::config::{DdnsConfig, RecordConfig};
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsRecord, IpSource};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Tick step at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStage {
    /// Listing provider records
    RecordLookup,
    /// Querying the public IP service
    IpLookup,
    /// Creating the missing record
    Create,
    /// Updating the stale record
    Update,
}

impl std::fmt::Display for TickStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TickStage::RecordLookup => "record lookup",
            TickStage::IpLookup => "ip lookup",
            TickStage::Create => "create",
            TickStage::Update => "update",
        };
        f.write_str(name)
    }
}

/// Events emitted by the DdnsEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        hostname: String,
        interval_secs: u64,
    },

    /// Missing record was created
    RecordCreated {
        hostname: String,
        ip: String,
    },

    /// Stale record was updated
    RecordUpdated {
        hostname: String,
        previous_ip: String,
        new_ip: String,
    },

    /// Record already pointed at the observed IP
    RecordUnchanged {
        hostname: String,
        ip: String,
    },

    /// Tick abandoned
    TickFailed {
        stage: TickStage,
        error: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`]
/// 3. Engine ticks every `interval_secs` until a shutdown signal is received
///
/// ## Scheduling
///
/// Ticks never overlap. A tick runs to completion, then the engine sleeps for
/// the configured interval. Shutdown is only observed while sleeping.
pub struct DdnsEngine {
    /// IP source for observing the public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider holding the record
    provider: Box<dyn DnsProvider>,

    /// The managed record
    record: RecordConfig,

    /// Pause between ticks
    interval: Duration,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: DDNS configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            ip_source,
            provider,
            record: config.record,
            interval: Duration::from_secs(config.engine.interval_secs),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run the engine until SIGINT
    pub async fn run(&self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the engine until `shutdown` completes
    ///
    /// The first tick starts immediately.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.emit_event(EngineEvent::Started {
            hostname: self.record.fqdn(),
            interval_secs: self.interval.as_secs(),
        });
        info!(
            "Managing A record {} via {} (interval: {:?})",
            self.record.fqdn(),
            self.provider.provider_name(),
            self.interval
        );

        tokio::pin!(shutdown);

        loop {
            self.reconcile_once().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }

        info!("Engine stopped");
    }

    /// Run the engine with a programmatic shutdown signal
    ///
    /// `None` falls back to [`DdnsEngine::run()`].
    pub async fn run_with_shutdown(&self, shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>) {
        match shutdown_rx {
            Some(rx) => {
                self.run_until(async {
                    let _ = rx.await;
                })
                .await
            }
            None => self.run().await,
        }
    }

    /// Run a single reconciliation tick
    ///
    /// Outcomes are reported through logs and engine events only. The tick
    /// stops at the first failure; nothing is retried until the next tick.
    pub async fn reconcile_once(&self) {
        let hostname = self.record.fqdn();

        let existing = match self.find_record().await {
            Ok(existing) => existing,
            Err(e) => {
                error!("Error while looking for existing record {}: {}", hostname, e);
                self.tick_failed(TickStage::RecordLookup, e);
                return;
            }
        };

        let ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                error!(
                    "Error while looking up own ip via {}: {}",
                    self.ip_source.source_name(),
                    e
                );
                self.tick_failed(TickStage::IpLookup, e);
                return;
            }
        };

        match existing {
            None => self.create_record(hostname, ip).await,
            Some(record) if record.answer == ip => {
                debug!("Record {} already has ip {}, nothing to do", hostname, ip);
                self.emit_event(EngineEvent::RecordUnchanged { hostname, ip });
            }
            Some(record) => self.update_record(hostname, record, ip).await,
        }
    }

    /// Find the first `A` record for the configured host
    async fn find_record(&self) -> Result<Option<DnsRecord>> {
        let records = self.provider.list_records(&self.record.domain).await?;
        debug!(
            "Provider returned {} record(s) for {}",
            records.len(),
            self.record.domain
        );

        Ok(records
            .into_iter()
            .find(|r| r.is_a_record_for(&self.record.host)))
    }

    async fn create_record(&self, hostname: String, ip: String) {
        let record = DnsRecord::a(self.record.host.as_str(), ip.as_str(), self.record.ttl);

        if let Err(e) = self.provider.create_record(&self.record.domain, &record).await {
            error!("Error while creating A record {}: {}", hostname, e);
            self.tick_failed(TickStage::Create, e);
            return;
        }

        if self.provider.is_dry_run() {
            info!("[DRY-RUN] Would create host A record {} with ip {}", hostname, ip);
            return;
        }

        info!("Created host A record {} with ip {}", hostname, ip);
        self.emit_event(EngineEvent::RecordCreated { hostname, ip });
    }

    async fn update_record(&self, hostname: String, existing: DnsRecord, ip: String) {
        let updated = existing.with_answer(ip.as_str());

        if let Err(e) = self.provider.update_record(&self.record.domain, &updated).await {
            error!("Error while updating A record {}: {}", hostname, e);
            self.tick_failed(TickStage::Update, e);
            return;
        }

        if self.provider.is_dry_run() {
            info!(
                "[DRY-RUN] Would update host A record {}, ip from {} to {}",
                hostname, existing.answer, ip
            );
            return;
        }

        info!(
            "Updated host A record {}, changed ip from {} to {}",
            hostname, existing.answer, ip
        );
        self.emit_event(EngineEvent::RecordUpdated {
            hostname,
            previous_ip: existing.answer,
            new_ip: ip,
        });
    }

    fn tick_failed(&self, stage: TickStage, error: Error) {
        self.emit_event(EngineEvent::TickFailed {
            stage,
            error: error.to_string(),
        });
    }

    /// Emit an engine event, dropping it if the channel is full or closed
    fn emit_event(&self, event: EngineEvent) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}
