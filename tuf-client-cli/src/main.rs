mod args;
mod config;
mod storage;
mod transport;

use crate::args::Args;
use crate::config::Config;
use crate::storage::FilesystemStorage;
use crate::transport::RepositoryTransport;
use anyhow::{Context, Result};
use clap::Parser;
use tokio::fs::read_to_string;
use tracing::{info, warn};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tuf_client::{Client, RepositoryUrls};

fn configure_logging(cli: &Args) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            Targets::new()
                .with_target(env!("CARGO_PKG_NAME").replace('-', "_"), &cli.log_level)
                .with_target("tuf_client", &cli.log_level)
                .with_target("reqwest", tracing_core::Level::INFO),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    configure_logging(&args);

    let config: Config = read_to_string(&args.config)
        .await
        .context("failed to read config file")
        .and_then(|s| serde_yaml::from_str(&s).context("failed to parse config file"))?;

    let storage = FilesystemStorage::open(&config.storage)
        .await
        .context("failed to open metadata storage")?;
    let transport = RepositoryTransport::for_url(&config.repository);
    let urls = RepositoryUrls::new(config.repository.clone());
    let mut client = Client::new(config.client.clone(), storage, transport, urls);

    if let Some(path) = &config.bootstrap_root {
        let root = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read bootstrap root {}", path.display()))?;
        client
            .bootstrap_root(&root)
            .await
            .context("failed to bootstrap root")?;
    }

    let cancel = client.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling update");
            cancel.cancel();
        }
    });

    client
        .refresh()
        .await
        .context("failed to refresh trusted metadata")?;

    if let (Some(root), Some(timestamp), Some(snapshot)) = (
        client.trusted_root(),
        client.trusted_timestamp(),
        client.trusted_snapshot(),
    ) {
        info!(
            root = root.version(),
            timestamp = timestamp.version(),
            snapshot = snapshot.version(),
            expires = %snapshot.expires(),
            "metadata is up to date"
        );
    }
    Ok(())
}
