use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tarot_reader::core::{store, ConfigProvider};
use tarot_reader::utils::{logger, validation::Validate};
use tarot_reader::{app, router, AppState, CliConfig, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.json_logs);
    tracing::info!("Starting tarot-reader");

    match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config file '{}'", path))?
                .with_cli_overrides(&cli);
            serve(config).await
        }
        None => serve(cli).await,
    }
}

async fn serve<C: ConfigProvider + Validate>(config: C) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let orchestrator = Arc::new(app::build_orchestrator(&config)?);

    if let Some(ttl) = config.interpretation_ttl() {
        let every = store::sweep_interval(ttl);
        tracing::info!(ttl_secs = ttl.as_secs(), every_secs = every.as_secs(), "Interpretation expiry enabled");
        store::spawn_expiry_sweeper(Arc::clone(orchestrator.store()), ttl, every);
    }

    let service = router(AppState::new(orchestrator), config.request_timeout());

    let addr = format!("{}:{}", config.host(), config.port());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(testing = config.testing_mode(), "Listening on http://{}", addr);

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
