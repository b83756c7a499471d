// # aliddnsd - dynamic DNS daemon
//
// Thin integration layer only: reads configuration from environment
// variables, initializes logging and the runtime, wires the resolver and
// the provider together, and hands control to the scheduler. All
// reconciliation logic lives in aliddns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `ALIDDNS_ACCESS_KEY_ID`: RAM access key id (required)
// - `ALIDDNS_ACCESS_KEY_SECRET`: RAM access key secret (required)
// - `ALIDDNS_DOMAIN`: domain to keep pointed at this host (required)
// - `ALIDDNS_RR`: host-record prefix ("@" for the bare domain, default "@")
// - `ALIDDNS_RECORD_TYPE`: record type (default "A")
// - `ALIDDNS_ENDPOINT`: alidns regional endpoint
//   (default "alidns.cn-hangzhou.aliyuncs.com")
// - `ALIDDNS_LOOKUP_URL`: public address reporting endpoint
// - `ALIDDNS_INTERVAL_SECS`: seconds between cycles (default 600)
// - `ALIDDNS_LOG_LEVEL`: trace|debug|info|warn|error (default "info")
//
// ## Example
//
// ```bash
// export ALIDDNS_ACCESS_KEY_ID=your_key_id
// export ALIDDNS_ACCESS_KEY_SECRET=your_key_secret
// export ALIDDNS_DOMAIN=example.com
// export ALIDDNS_RR=@
//
// aliddnsd
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use aliddns_core::config::{DEFAULT_ENDPOINT, DEFAULT_RECORD_TYPE, DEFAULT_RR};
use aliddns_core::{DomainConfig, Reconciler, Scheduler};
use aliddns_ip_http::{DEFAULT_LOOKUP_URL, HttpAddressResolver};
use aliddns_provider_alidns::AlidnsFactory;

/// Default seconds between reconciliation cycles (10 minutes).
const DEFAULT_INTERVAL_SECS: u64 = 600;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application settings assembled from the environment
struct Settings {
    domain: DomainConfig,
    lookup_url: String,
    interval_secs: u64,
    log_level: String,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        let domain = DomainConfig {
            access_key_id: env::var("ALIDDNS_ACCESS_KEY_ID")
                .context("ALIDDNS_ACCESS_KEY_ID is required")?,
            access_key_secret: env::var("ALIDDNS_ACCESS_KEY_SECRET")
                .context("ALIDDNS_ACCESS_KEY_SECRET is required")?,
            domain_name: env::var("ALIDDNS_DOMAIN").context("ALIDDNS_DOMAIN is required")?,
            rr: env::var("ALIDDNS_RR").unwrap_or_else(|_| DEFAULT_RR.to_string()),
            record_type: env::var("ALIDDNS_RECORD_TYPE")
                .unwrap_or_else(|_| DEFAULT_RECORD_TYPE.to_string()),
            endpoint: env::var("ALIDDNS_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
        };

        let interval_secs = match env::var("ALIDDNS_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("ALIDDNS_INTERVAL_SECS is not a number: '{raw}'"))?,
            Err(_) => DEFAULT_INTERVAL_SECS,
        };

        Ok(Self {
            domain,
            lookup_url: env::var("ALIDDNS_LOOKUP_URL")
                .unwrap_or_else(|_| DEFAULT_LOOKUP_URL.to_string()),
            interval_secs,
            log_level: env::var("ALIDDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        self.domain.validate()?;

        if !(10..=86_400).contains(&self.interval_secs) {
            anyhow::bail!(
                "ALIDDNS_INTERVAL_SECS must be between 10 and 86400 seconds. Got: {}",
                self.interval_secs
            );
        }

        if !self.lookup_url.starts_with("https://") && !self.lookup_url.starts_with("http://") {
            anyhow::bail!(
                "ALIDDNS_LOOKUP_URL must use the HTTP or HTTPS scheme. Got: {}",
                self.lookup_url
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "ALIDDNS_LOG_LEVEL '{other}' is not valid. \
                Valid levels: trace, debug, info, warn, error"
            ),
        }

        Ok(())
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from the environment
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Configuration validation error: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    info!("starting aliddnsd");

    // Enter the tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(settings).await {
            error!("daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    })
    .into()
}

/// Wire the components together and run the scheduler until shutdown
async fn run_daemon(settings: Settings) -> Result<()> {
    info!(
        domain = %settings.domain.domain_name,
        rr = %settings.domain.rr,
        record_type = %settings.domain.record_type,
        endpoint = %settings.domain.endpoint,
        interval_secs = settings.interval_secs,
        "managing record"
    );

    let resolver = Box::new(HttpAddressResolver::new(settings.lookup_url.clone()));
    let reconciler = Reconciler::new(Box::new(AlidnsFactory), resolver, settings.domain)?;
    let scheduler = Scheduler::with_interval(
        reconciler,
        Duration::from_secs(settings.interval_secs),
    );

    scheduler.run().await?;

    info!("daemon stopped");
    Ok(())
}
