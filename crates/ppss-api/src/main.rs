//! PPSS CLI and REST API entry point.
//!
//! Binary name: `ppss`

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::{error, info};

use ppss_observe::tracing_setup::{LogFormat, TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Shell completions don't need logging or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ppss", &mut std::io::stdout());
        return Ok(());
    }

    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    init_tracing(&TracingOptions {
        default_directive: cli.log_directive().to_string(),
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        },
        enable_otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Status { json } => cli::status::status(&state, json).await,
        Commands::Serve { host, port, .. } => serve(state, host, port).await,
        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}

async fn serve(state: AppState, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| state.config.server.host.clone());
    let port = port.unwrap_or(state.config.server.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} PPSS API listening on {} ({} gateway)",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan(),
        state.gateway.name()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());
    info!(%addr, gateway = state.gateway.name(), "Server started");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
