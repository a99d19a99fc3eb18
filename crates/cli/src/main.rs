mod args;
mod desktop;
mod output;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easel_core::{
    load_config_or_default, validate_config, AcquisitionOrchestrator, CandidateSelector,
    CatalogCache, Config, FsImageStore, HttpTransport, ImageTransport, JsonSettingsStore,
    SourceRegistry,
};

use args::{Cli, Command};
use desktop::CommandSetter;
use terminal::TerminalSurface;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::print_error(&e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so command output stays clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine config path
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("EASEL_CONFIG").ok().map(PathBuf::from));

    // Load configuration
    let config = load_config_or_default(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load default config".to_string(),
    })?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Storage directory: {:?}", config.storage.dir);

    let orchestrator = build_orchestrator(&config)?;
    if let Some(source) = orchestrator.restore_source().await {
        debug!("Using saved source {}", source);
    }

    match cli.cmd {
        Command::Show => {
            orchestrator.load_initial().await?;
        }
        Command::Refresh { apply } => {
            orchestrator.refresh().await?;
            if apply {
                orchestrator.set_wallpaper(&CommandSetter::detect()).await?;
            }
        }
        Command::Set => {
            orchestrator.set_wallpaper(&CommandSetter::detect()).await?;
        }
        Command::Sources => {
            let registry = orchestrator.registry();
            println!(
                "{}",
                output::format_sources(&registry.list_all(), registry.active_id().as_deref())
            );
        }
        Command::Use { id } => {
            orchestrator
                .select_source(&id)
                .await
                .with_context(|| format!("Failed to switch to source {:?}", id))?;
            info!("Switched to source {}", id);
            println!("Now using {}", id);
        }
    }

    Ok(())
}

fn build_orchestrator(config: &Config) -> Result<AcquisitionOrchestrator> {
    let registry = Arc::new(
        SourceRegistry::with_default_sources(config).context("Failed to create catalog sources")?,
    );

    let transport: Arc<dyn ImageTransport> = Arc::new(
        HttpTransport::new(&config.transport).context("Failed to create HTTP transport")?,
    );

    let selector = CandidateSelector::new(
        config.selection.clone(),
        Arc::new(CatalogCache::new(config.selection.cache_ttl())),
        Arc::clone(&transport),
    );

    Ok(AcquisitionOrchestrator::new(
        config.acquisition.clone(),
        registry,
        selector,
        transport,
        FsImageStore::from_config(&config.storage),
        Arc::new(JsonSettingsStore::in_dir(&config.storage.dir)),
        Arc::new(TerminalSurface),
    ))
}
