mod app;
mod config_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tracing::info;

use ringforge_config::RingConfig;
use ringforge_gateway::{build_router, start_server};

use app::Services;

#[derive(Parser)]
#[command(name = "ringforge")]
#[command(about = "ringforge: a phone-call voice assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Place one outbound call and exit
    Call {
        /// Destination number in E.164 form
        number: String,
    },
    /// Show the health of a running server
    Status {
        /// Server URL (defaults to localhost on the configured port)
        #[arg(long)]
        url: Option<String>,
    },
    /// Print the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ringforge_config::from_env().context("Invalid environment configuration")?;

    match cli.command {
        Commands::Serve { port } => {
            let mut config = start(config)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await
        }
        Commands::Call { number } => {
            let config = start(config)?;
            place_call(&config, &number).await
        }
        Commands::Status { url } => {
            let url = url.unwrap_or_else(|| format!("http://localhost:{}", config.server.port));
            status_cmd::run(&url).await
        }
        Commands::Config => config_cmd::run(&config),
    }
}

/// Install logging, then validate.
fn start(config: RingConfig) -> Result<RingConfig> {
    logging::init_logger(&config.logging.dir, &config.logging.level);
    ringforge_config::prepare(config)
}

async fn run_server(config: RingConfig) -> Result<()> {
    info!(
        port = config.server.port,
        bind = %config.server.bind_address,
        base_url = %config.server.public_base_url,
        "Starting ringforge"
    );

    let services = Services::build(&config).await?;
    let app = build_router(services.gateway_state(), services.audio_dir.clone())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;
    start_server(addr, app).await
}

async fn place_call(config: &RingConfig, number: &str) -> Result<()> {
    let links = ringforge_agent::CallbackLinks::new(&config.server.public_base_url);
    let initiator = app::call_initiator(config, &links);
    match initiator.initiate(number).await {
        Some(call) => {
            terminal_output::note_success(&format!("Call requested ({})", call.request_uuid));
            Ok(())
        }
        None => anyhow::bail!("Call could not be placed; see logs for details"),
    }
}
