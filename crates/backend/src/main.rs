pub mod api;
pub mod dashboards;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod system;

use std::sync::Arc;

use crate::domain::a001_retail_transaction::DatasetCache;
use crate::shared::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let dataset_path = shared::config::get_dataset_path(&config);

    // The dashboard is not served until the dataset is in memory
    let cache = Arc::new(DatasetCache::new(dataset_path.clone()));
    let loader = cache.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        loader
            .get_or_load()
            .map(|dataset| (dataset.len(), dataset.countries().len()))
    })
    .await?;

    match loaded {
        Ok((rows, countries)) => {
            tracing::info!(
                "Dataset ready: {} rows, {} countries",
                shared::format::format_number(rows as u64),
                countries
            );
        }
        Err(e) => {
            tracing::error!("Failed to load dataset {}: {}", dataset_path.display(), e);
            return Err(anyhow::anyhow!(
                "dataset load failed ({}): {e}",
                dataset_path.display()
            ));
        }
    }

    let state = AppState::new(cache, config.dashboard.settings());

    let app = routes::build_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Server listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
