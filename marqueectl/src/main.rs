//! # marqueectl
//!
//! Administrative entry point for the Marquee catalog synchronization
//! engine. Each subcommand runs one sync operation to completion (or until
//! Ctrl-C) and logs a summary.

mod cli;
mod run;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use marquee_config::{
    Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions, ConfigWarnings,
};
use marquee_core::{
    CancellationToken, CatalogSync, InMemoryCatalogStore, PostgresCatalogStore,
    TmdbClient,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ConfigLoad { config, warnings } =
        ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: cli.global.config.clone(),
            env_file: cli.global.env_file.clone(),
        })
        .load()
        .context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,marquee_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    report_config(&config, &warnings);

    if matches!(cli.command, Command::Migrate) {
        if cli.global.in_memory {
            anyhow::bail!(
                "migrate needs a PostgreSQL database; drop --in-memory"
            );
        }
        let store = connect_postgres(&config).await?;
        store.migrate().await.context("database migration failed")?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_watcher(cancel.clone());

    let source = Arc::new(
        TmdbClient::new(&config.provider_settings())
            .context("failed to build provider client")?,
    );
    let settings = config.sync_settings();

    if cli.global.in_memory {
        warn!("running against an in-memory catalog; nothing is persisted");
        let store = Arc::new(InMemoryCatalogStore::new());
        let sync = CatalogSync::new(store, source, settings);
        run::execute(&sync, cli.command, &config.sync, &cancel).await
    } else {
        let store = connect_postgres(&config).await?;
        let sync = CatalogSync::new(Arc::new(store), source, settings);
        run::execute(&sync, cli.command, &config.sync, &cancel).await
    }
}

fn report_config(config: &Config, warnings: &ConfigWarnings) {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }
    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!(
                message = %warning.message,
                hint = %hint,
                "configuration warning"
            ),
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }
}

async fn connect_postgres(
    config: &Config,
) -> anyhow::Result<PostgresCatalogStore> {
    let url = config
        .database
        .url
        .as_deref()
        .context(
            "no database URL configured; set DATABASE_URL or pass --in-memory",
        )?;
    PostgresCatalogStore::connect(url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")
}

fn spawn_interrupt_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; stopping after the current item");
            cancel.cancel();
        }
    });
}
