//! Web server for the pipeline output dashboards.
//!
//! Serves two views over the same catalog:
//! - an overview dashboard paging through every output folder's artifacts
//! - a review dashboard restricted to folders whose citation inference
//!   succeeded, with a running count of the ones that failed

mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::config::Settings;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub catalog: Arc<RwLock<Catalog>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let catalog = Catalog::scan(&settings.outputs_dir);
        tracing::info!(
            "indexed {} output folders ({} failed inference)",
            catalog.len(),
            catalog.failed_count()
        );
        Self {
            settings: settings.clone(),
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Re-derive the catalog from the outputs root.
    pub async fn rescan(&self) {
        let fresh = Catalog::scan(&self.settings.outputs_dir);
        tracing::info!("rescan: {} output folders", fresh.len());
        *self.catalog.write().await = fresh;
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
