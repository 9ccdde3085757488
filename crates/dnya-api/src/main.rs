//! Dnya CLI and REST API entry point.
//!
//! Binary name: `dnya`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! requested command or starts the REST API server.

mod cli;

use clap::Parser;
use clap_complete::generate;

use dnya_api::http;
use dnya_api::state::{AppState, Environment};
use dnya_infra::sqlite::message::SqliteMessageRepository;
use dnya_observe::tracing_setup::{self, TracingOptions};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "dnya", &mut std::io::stdout());
        return Ok(());
    }

    let options = TracingOptions::new(tracing_setup::verbosity_filter(cli.verbose, cli.quiet))
        .json(cli.json)
        .otel(cli.otel);
    tracing_setup::init_tracing(&options).map_err(|e| anyhow::anyhow!("tracing init: {e}"))?;

    let env = Environment::load().await?;

    let result = match cli.command {
        Commands::Serve { port, host } => serve(env, host, port, cli.quiet).await,
        Commands::History { user_id, limit } => {
            let repo = SqliteMessageRepository::new(env.open_database().await?);
            cli::history::show_history(&repo, &user_id, limit, cli.json).await
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    tracing_setup::shutdown_tracing();
    result
}

async fn serve(
    env: Environment,
    host: Option<String>,
    port: Option<u16>,
    quiet: bool,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| env.config.server.host.clone());
    let port = port.unwrap_or(env.config.server.port);

    let state = AppState::init(env).await?;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    if !quiet {
        println!(
            "  {} Dnya API listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}
