use calorix_api::{AppState, RestApi};
use calorix_core::{FallbackTable, FeatureSchema, Predictor, PredictorConfig};
use calorix_storage::CatalogStore;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Calorie and macro estimation service
#[derive(Parser, Debug)]
#[command(name = "calorix")]
#[command(about = "Catalog-backed calorie estimation service", long_about = None)]
struct Args {
    /// JSON catalog file; created from the sample dataset if missing.
    /// Without it the catalog lives in memory only.
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Catalog size below which similarity prediction is disabled
    #[arg(long, default_value_t = 10)]
    min_samples: usize,

    /// JSON file overriding the feature and/or fallback keyword tables
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Deserialize, Default)]
struct TablesFile {
    features: Option<FeatureSchema>,
    fallback: Option<FallbackTable>,
}

fn load_tables(path: &Path) -> anyhow::Result<TablesFile> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Calorix v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP API port: {}", args.http_port);

    let tables = match &args.tables {
        Some(path) => {
            info!("Loading keyword tables from {:?}", path);
            load_tables(path)?
        }
        None => TablesFile::default(),
    };

    let config = PredictorConfig {
        min_samples: args.min_samples,
        features: tables.features.unwrap_or_default(),
        fallback: tables.fallback.unwrap_or_default(),
        ..PredictorConfig::default()
    };
    config.validate()?;

    let catalog = match &args.catalog {
        Some(path) => {
            info!("Catalog file: {:?}", path);
            Arc::new(CatalogStore::open(path)?)
        }
        None => {
            info!("No catalog file given, using the in-memory sample catalog");
            Arc::new(CatalogStore::seeded())
        }
    };

    let state = AppState::new(Arc::new(Predictor::new(config)), catalog);
    let report = state.retrain()?;
    info!("Predictor ready: trained={} samples={}", report.trained, report.samples);

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Calorix started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
