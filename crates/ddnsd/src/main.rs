// # ddnsd - DDNS Daemon
//
// Keeps one name.com `A` record pointed at this machine's public IP.
//
// The ddnsd daemon is responsible for:
// 1. Reading configuration from environment variables (once, at startup)
// 2. Initializing logging and the runtime
// 3. Building the name.com provider and the HTTP IP source
// 4. Running the reconciler until SIGTERM/SIGINT
//
// All reconciliation logic lives in ddns-core.
//
// ## Configuration
//
// ### Required
// - `USERNAME`: name.com account username
// - `TOKEN`: name.com API token
// - `HOST`: Host label to manage (e.g. `home`); empty for the zone apex
// - `DOMAIN`: Zone the record lives in (e.g. `example.com`)
//
// ### Optional
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `DDNS_INTERVAL_SECS`: Pause between ticks in seconds (default: 10)
// - `DDNS_PROVIDER_URL`: name.com API root (default: https://api.name.com)
// - `DDNS_IP_SERVICE_URL`: Plain-text IP lookup URL (default: https://api.ipify.org?format=text)
// - `DDNS_MODE`: Set to `dry-run` to log writes instead of sending them
//
// ## Example
//
// ```bash
// export USERNAME=jdoe
// export TOKEN=your_token
// export HOST=home
// export DOMAIN=example.com
//
// ddnsd
// ```

use anyhow::Result;
use ddns_core::{DdnsConfig, DdnsEngine};
use ddns_ip_http::HttpIpSource;
use ddns_provider_namecom::NameComProvider;
use std::env;
use std::future::Future;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    ddns: DdnsConfig,
    log_level: Level,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| {
                anyhow::anyhow!("environment variable {} is undefined, aborting...", name)
            })
        };
        let username = require("USERNAME")?;
        let token = require("TOKEN")?;
        let host = require("HOST")?;
        let domain = require("DOMAIN")?;

        let mut ddns = DdnsConfig::new(username, token, host, domain);

        if let Some(url) = lookup("DDNS_PROVIDER_URL") {
            ddns.provider.base_url = url;
        }
        if let Some(url) = lookup("DDNS_IP_SERVICE_URL") {
            ddns.ip_source.url = url;
        }
        if let Some(interval) = lookup("DDNS_INTERVAL_SECS") {
            ddns.engine.interval_secs = interval.trim().parse().map_err(|_| {
                anyhow::anyhow!(
                    "DDNS_INTERVAL_SECS must be a positive number of seconds. Got: {}",
                    interval
                )
            })?;
        }
        ddns.provider.dry_run = lookup("DDNS_MODE")
            .map(|mode| mode.to_lowercase() == "dry-run")
            .unwrap_or(false);

        let log_level = match lookup("DDNS_LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            other => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        };

        ddns.validate()?;

        Ok(Self { ddns, log_level })
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");

    let provider = match NameComProvider::new(&config.ddns.provider) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create name.com provider: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let ip_source = match HttpIpSource::from_config(&config.ddns.ip_source) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to create IP source: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let engine = match DdnsEngine::new(Box::new(ip_source), Box::new(provider), config.ddns) {
        // Outcomes are reported through logs; nobody consumes the event channel
        Ok((engine, _events)) => engine,
        Err(e) => {
            error!("Failed to create engine: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(engine).await {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the reconciler until a shutdown signal arrives
async fn run_daemon(engine: DdnsEngine) -> Result<()> {
    let shutdown = shutdown_signal()?;

    engine
        .run_until(async {
            let signal = shutdown.await;
            info!("Received shutdown signal: {}", signal);
        })
        .await;

    info!("Shutting down daemon");
    Ok(())
}

/// Install SIGTERM and SIGINT handlers
///
/// # Returns
///
/// A future resolving to the name of the first signal received.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Install a CTRL-C handler
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to wait for CTRL-C: {}", e);
            std::future::pending::<()>().await;
        }
        "SIGINT"
    })
}
