//! Sentimento Server
//!
//! Serves multilingual sentiment predictions over HTTP, or runs one-off
//! predictions from the command line against the same model artifacts.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentimento_core::PredictionResponse;
use sentimento_server::{create_router, AppState, Cli, Commands, ServerConfig};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let config = ServerConfig::load(&cli.config)?.with_cli(&cli);

    match &cli.command {
        Commands::Serve { .. } => serve(config).await?,

        Commands::Predict { text, algorithm } => {
            let state = AppState::from_config(&config.engine)?;
            let result = state.router.route(text, algorithm)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&PredictionResponse::from(result))?
            );
        }

        Commands::Compare { text } => {
            let state = AppState::from_config(&config.engine)?;
            let results: Vec<PredictionResponse> = state
                .router
                .compare(text)?
                .into_iter()
                .map(Into::into)
                .collect();
            println!("{}", serde_json::to_string_pretty(&results)?);
        }

        Commands::Models => {
            let state = AppState::from_config(&config.engine)?;
            let models = state.router.registry().available_models();

            println!("Models directory: {}", config.engine.registry.models_dir.display());
            println!("Loaded models: {}", models.len());
            for key in &models {
                println!("  {}", key);
            }

            if state.load_report.has_failures() {
                println!("Load failures: {}", state.load_report.failures.len());
                for failure in &state.load_report.failures {
                    println!("  {}", failure.to_error());
                }
            }
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!("Starting Sentimento Server");

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    info!("Loading model artifacts...");
    let state = AppState::from_config(&config.engine)?.with_metrics_handle(metrics_handle);

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(state, &config.cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    // Graceful shutdown handler
    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentimento_classifiers=debug,sentimento_server=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("sentimento_classifiers=info,sentimento_server=info")
        })
    };

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentimento_requests_total",
        "Total number of successful predictions by algorithm and language"
    );
    metrics::describe_counter!("sentimento_errors_total", "Total number of errors by kind");
    metrics::describe_histogram!(
        "sentimento_inference_latency_us",
        metrics::Unit::Microseconds,
        "Inference latency in microseconds"
    );
    metrics::describe_gauge!("sentimento_models_loaded", "Number of loaded classifiers");

    info!("Metrics exporter initialized");
    Ok(handle)
}
