//! Alarm target handler (v1)
//!
//! Handles one alarm state-change notification and toggles the alarmed
//! endpoint's membership in a load balancer target group.
//!
//! # Architecture Overview
//!
//! ```text
//!   notification (file or stdin)
//!          │
//!          ▼
//!   ┌─────────────┐    ┌──────────────┐    ┌──────────────────┐
//!   │    event    │───▶│   handler    │───▶│  load_balancer   │──▶ AWS SDK
//!   │   decode    │    │  decision    │    │ AwsElbClient or  │    or Query API
//!   │             │    │              │    │  QueryApiClient  │    emulator
//!   └─────────────┘    └──────┬───────┘    └──────────────────┘
//!                             │
//!                             ▼
//!                      outcome line (log + stdout)
//!
//!   config (TOML + TARGET_GROUP_ARN)   observability (tracing)
//! ```
//!
//! Exit status is non-zero for malformed input, missing configuration, or an
//! unreachable load balancer. A rejected registration or deregistration is
//! reported in the outcome line and still exits zero.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use alarm_target_handler::config::{load_config, HandlerConfig, LogFormat, ServiceBackend};
use alarm_target_handler::observability::init_logging;
use alarm_target_handler::{AwsElbClient, QueryApiClient, TargetGroupService, TransitionHandler};

#[derive(Parser)]
#[command(name = "alarm-target-handler")]
#[command(about = "Toggle target group membership on alarm state changes", long_about = None)]
struct Cli {
    /// TOML configuration file. `TARGET_GROUP_ARN` overrides its target group.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Notification JSON file. Read from stdin when omitted.
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// Override the configured log format.
    #[arg(long, value_enum)]
    log_format: Option<CliLogFormat>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.observability.log_format = format.into();
    }
    init_logging(&config.observability)?;

    tracing::info!(
        target_group = %config.target_group.arn,
        backend = ?config.service.backend,
        endpoint = config.service.endpoint.as_deref().unwrap_or("default"),
        "alarm-target-handler v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let raw = match &cli.event {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    match config.service.backend {
        ServiceBackend::Aws => {
            let client = AwsElbClient::from_config(&config.service).await;
            run(&config, client, &raw).await
        }
        ServiceBackend::QueryApi => {
            let client = QueryApiClient::new(&config.service)?;
            run(&config, client, &raw).await
        }
    }
}

async fn run<S: TargetGroupService>(
    config: &HandlerConfig,
    service: S,
    raw: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let handler = TransitionHandler::new(config, service)?;

    match handler.handle(raw).await {
        Ok(outcome) => {
            println!("{}", outcome);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Invocation failed");
            Err(e.into())
        }
    }
}
