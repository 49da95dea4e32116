//! failover-dispatch CLI
//!
//! Builds a dispatcher from a TOML file and/or `--endpoint` flags, runs the
//! health monitor, sends a batch of HTTP requests through it and reports the
//! resulting pool state.
//!
//! ```text
//! endpoints ──▶ pre-add probe ──▶ active set ──▶ round robin ──▶ GET <endpoint><path>
//!                                    ▲    │
//!                      restore ──────┘    └────── quarantine
//!                                 health monitor
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use failover_dispatch::config::loader::load_config;
use failover_dispatch::config::AppConfig;
use failover_dispatch::observability::{logging, metrics};
use failover_dispatch::{BoxError, Endpoint, Failover, FailurePolicy, HttpProbe, RequestOptions};

#[derive(Parser)]
#[command(name = "failover-dispatch")]
#[command(about = "Send requests through a self-healing pool of endpoints", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra endpoint address (repeatable).
    #[arg(short, long = "endpoint")]
    endpoints: Vec<String>,

    /// Number of requests to send.
    #[arg(short = 'n', long, default_value_t = 1)]
    requests: u32,

    /// Path requested on the selected endpoint.
    #[arg(short, long, default_value = "/")]
    path: String,

    /// Failure policy override for the requests.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Attempt ceiling override for the requests.
    #[arg(long)]
    max_attempts: Option<u16>,

    /// Keep the health monitor running this long before reporting.
    #[arg(long, default_value_t = 0)]
    watch_secs: u64,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    RemoveAndQuarantine,
    Ignore,
    ReturnError,
    ReconnectNext,
    ReconnectCurrent,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::RemoveAndQuarantine => FailurePolicy::RemoveAndQuarantine,
            PolicyArg::Ignore => FailurePolicy::Ignore,
            PolicyArg::ReturnError => FailurePolicy::ReturnError,
            PolicyArg::ReconnectNext => FailurePolicy::ReconnectNext,
            PolicyArg::ReconnectCurrent => FailurePolicy::ReconnectCurrent,
        }
    }
}

#[derive(Serialize)]
struct Summary {
    succeeded: u32,
    failed: u32,
    active: Vec<String>,
    quarantined: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("failover-dispatch v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse::<SocketAddr>()?);
    }

    tracing::info!(
        check_before_adding = config.failover.check_before_adding,
        interval_ms = config.failover.health_check_interval_ms,
        policy = config.failover.failure_policy.as_str(),
        "Configuration loaded"
    );

    let probe = HttpProbe::with_timeout(config.probe.path.clone(), config.failover.check_timeout())?;
    let failover = Failover::new(probe, config.failover.clone());

    for raw in config.endpoints.iter().chain(cli.endpoints.iter()) {
        let endpoint = match Endpoint::parse(raw) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                tracing::warn!(endpoint = %raw, error = %e, "Skipping endpoint");
                continue;
            }
        };
        if let Err(e) = failover.add_endpoint(endpoint).await {
            tracing::warn!(error = %e, "Endpoint not added");
        }
    }

    let health = failover.start_health_checks();

    let mut options = RequestOptions::new();
    if let Some(policy) = cli.policy {
        options = options.failure_policy(policy.into());
    }
    if let Some(attempts) = cli.max_attempts {
        options = options.max_attempts(attempts);
    }

    let client = reqwest::Client::builder()
        .timeout(config.failover.check_timeout())
        .build()?;

    let mut succeeded = 0;
    let mut failed = 0;
    for i in 0..cli.requests {
        let result = failover
            .execute_with(
                |endpoint: Endpoint| {
                    let client = client.clone();
                    let path = cli.path.clone();
                    async move {
                        let target = endpoint.url().join(&path)?;
                        let response = client.get(target).send().await?.error_for_status()?;
                        tracing::debug!(endpoint = %endpoint, status = %response.status(), "Request succeeded");
                        Ok::<(), BoxError>(())
                    }
                },
                options,
            )
            .await;

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => {
                tracing::error!(request = i, error = %e, "Request failed");
                failed += 1;
            }
        }
    }

    if cli.watch_secs > 0 {
        tracing::info!(seconds = cli.watch_secs, "Watching pool");
        tokio::time::sleep(Duration::from_secs(cli.watch_secs)).await;
    }

    health.stop().await;

    let summary = Summary {
        succeeded,
        failed,
        active: failover.active_endpoints().iter().map(|e| e.to_string()).collect(),
        quarantined: failover.quarantined_endpoints().iter().map(|e| e.to_string()).collect(),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("requests: {} succeeded, {} failed", summary.succeeded, summary.failed);
        println!("active: {}", summary.active.join(", "));
        println!("quarantined: {}", summary.quarantined.join(", "));
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
