mod cli;

use media_viewer::{
    catalog::{Catalog, RefreshOutcome},
    config, server, source,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting media viewer");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("Metadata source: {}", config.source.kind.as_str());
    tracing::info!("Local media root: {:?}", config.media.root);

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "media_viewer=trace,media_viewer_common=debug,tower_http=debug".to_string()
        } else {
            "media_viewer=debug,tower_http=info".to_string()
        }
    });

    // Logs go to stderr so `refresh --json` output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Refresh { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(refresh_once(cli.config.as_deref(), json))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("media-viewer {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn refresh_once(config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let source =
        source::create_source(&config.source).context("Failed to create metadata source")?;
    let catalog = Catalog::new();

    if let RefreshOutcome::Failed { message } = catalog.refresh(source.as_ref()).await {
        anyhow::bail!(message);
    }

    let snapshot = catalog.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
        return Ok(());
    }

    let mut ids: Vec<_> = snapshot.keys().collect();
    ids.sort();

    println!("Source: {}", source.name());
    println!("Entries: {}", ids.len());
    for id in ids {
        let record = &snapshot[id];
        println!(
            "  {} [{}] {} -> {}",
            id, record.kind, record.title, record.file_path
        );
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Media root: {}", config.media.root.display());
            println!("  Static dir: {}", config.media.static_dir.display());
            println!("  Source: {}", config.source.kind.as_str());
            println!("  Timeout: {}s", config.source.timeout_secs);
            if config.source.refresh_interval_secs > 0 {
                println!(
                    "  Refresh interval: {}s",
                    config.source.refresh_interval_secs
                );
            } else {
                println!("  Refresh interval: manual");
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Source: {}", config.source.kind.as_str());
        }
    }

    Ok(())
}
