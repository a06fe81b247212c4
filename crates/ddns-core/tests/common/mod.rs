//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles record every call they receive and can be scripted to fail,
//! so tests can assert exactly which collaborator calls a tick made.

#![allow(dead_code)]

use ddns_core::config::DdnsConfig;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsRecord, IpSource};
use std::collections::VecDeque;
use std::io;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing::subscriber::DefaultGuard;

/// A provider call observed by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    List { domain: String },
    Create { domain: String, record: DnsRecord },
    Update { domain: String, record: DnsRecord },
}

#[derive(Default)]
struct ProviderState {
    records: Vec<DnsRecord>,
    calls: Vec<ProviderCall>,
    fail_list: bool,
    fail_create: bool,
    fail_update: bool,
    dry_run: bool,
}

/// In-memory DnsProvider that records calls
///
/// Clones share state, so a test can keep one handle and give the other to
/// the engine.
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already holds `records`
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::new();
        provider.state.lock().unwrap().records = records;
        provider
    }

    pub fn fail_list(self) -> Self {
        self.state.lock().unwrap().fail_list = true;
        self
    }

    pub fn fail_create(self) -> Self {
        self.state.lock().unwrap().fail_create = true;
        self
    }

    pub fn fail_update(self) -> Self {
        self.state.lock().unwrap().fail_update = true;
        self
    }

    /// Accept writes without applying them
    pub fn dry_run(self) -> Self {
        self.state.lock().unwrap().dry_run = true;
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Only the create/update calls
    pub fn writes(&self) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, ProviderCall::List { .. }))
            .collect()
    }

    pub fn list_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ProviderCall::List { .. }))
            .count()
    }

    /// Current provider-side records
    pub fn records(&self) -> Vec<DnsRecord> {
        self.state.lock().unwrap().records.clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::List {
            domain: domain.to_string(),
        });

        if state.fail_list {
            return Err(Error::provider("mock", "unexpected status 500 while listing"));
        }
        Ok(state.records.clone())
    }

    async fn create_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Create {
            domain: domain.to_string(),
            record: record.clone(),
        });

        if state.fail_create {
            return Err(Error::provider("mock", "unexpected status 422 while creating"));
        }
        if state.dry_run {
            return Ok(());
        }

        let id = state.records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        state.records.push(DnsRecord {
            id: Some(id),
            ..record.clone()
        });
        Ok(())
    }

    async fn update_record(&self, domain: &str, record: &DnsRecord) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Update {
            domain: domain.to_string(),
            record: record.clone(),
        });

        if state.fail_update {
            return Err(Error::provider("mock", "unexpected status 500 while updating"));
        }
        if state.dry_run {
            return Ok(());
        }

        match state.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(Error::provider("mock", "record not found")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn is_dry_run(&self) -> bool {
        self.state.lock().unwrap().dry_run
    }
}

/// IpSource that replays scripted answers
///
/// Once the script is exhausted the last answer repeats.
#[derive(Clone)]
pub struct ScriptedIpSource {
    answers: Arc<Mutex<VecDeque<Option<String>>>>,
    last: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl ScriptedIpSource {
    /// Source that always answers `ip`
    pub fn fixed(ip: &str) -> Self {
        Self::script(vec![Some(ip)])
    }

    /// Source that always fails
    pub fn failing() -> Self {
        Self::script(vec![None])
    }

    /// `None` entries are failures
    pub fn script(answers: Vec<Option<&str>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(
                answers.into_iter().map(|a| a.map(str::to_string)).collect(),
            )),
            last: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<String> {
        *self.call_count.lock().unwrap() += 1;

        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.answers.lock().unwrap().pop_front() {
            *last = next;
        }

        last.clone()
            .ok_or_else(|| Error::ip_source("unexpected status 503 while looking up own ip"))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// Existing provider record for `host`
pub fn a_record(id: i64, host: &str, answer: &str) -> DnsRecord {
    DnsRecord {
        id: Some(id),
        host: host.to_string(),
        record_type: "A".to_string(),
        answer: answer.to_string(),
        ttl: 300,
    }
}

/// Configuration managing `home.example.com`
pub fn home_config() -> DdnsConfig {
    DdnsConfig::new("user", "test-token", "home", "example.com")
}

/// In-memory sink for formatted log lines
///
/// Clones share the buffer. [`CapturedLogs::install`] routes every event on
/// the current thread into it until the guard is dropped.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every level, without timestamps or colors
    pub fn install(&self) -> DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Every captured line, in order
    pub fn lines(&self) -> Vec<String> {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines at `level` or more severe
    pub fn at_least(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| {
                line.split_whitespace()
                    .next()
                    .and_then(|l| Level::from_str(l).ok())
                    .is_some_and(|l| l <= level)
            })
            .collect()
    }

    pub fn clear(&self) {
        self.buf.lock().unwrap().clear();
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
