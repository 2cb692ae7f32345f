use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemBlobStore;
use tracing::{Level, info};

use server::config::AppConfig;
use server::coordinator::DocumentCoordinator;
use server::database::init_db;
use server::metadata::DbMetadataStore;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;

    let blob_store = FilesystemBlobStore::new(
        config.storage.root_dir.clone(),
        config.storage.max_blob_size,
    )
    .await
    .context("Failed to initialize blob storage")?;
    info!(
        root_dir = %config.storage.root_dir.display(),
        max_blob_size = config.storage.max_blob_size,
        "Blob storage ready"
    );

    let documents = DocumentCoordinator::new(
        Arc::new(blob_store),
        Arc::new(DbMetadataStore::new(db)),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        documents: Arc::new(documents),
        config,
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
