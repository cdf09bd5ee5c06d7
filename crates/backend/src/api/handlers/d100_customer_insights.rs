use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use contracts::dashboards::d100_customer_insights::{
    DashboardRequest, DashboardResponse, FilterOptions,
};

use crate::dashboards::d100_customer_insights::service::{self, DashboardError};
use crate::domain::a001_retail_transaction::CanonicalDataset;
use crate::shared::state::AppState;

/// Cached dataset; a cold cache is loaded on the blocking pool.
async fn dataset(state: &AppState) -> Result<&CanonicalDataset, StatusCode> {
    if let Some(dataset) = state.cache.get() {
        return Ok(dataset);
    }

    let cache = state.cache.clone();
    let loaded = tokio::task::spawn_blocking(move || cache.get_or_load().map(|_| ()))
        .await
        .map_err(|e| {
            tracing::error!("D100 Dashboard: Dataset load task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if let Err(e) = loaded {
        tracing::error!(
            "D100 Dashboard: Dataset {} is unavailable: {}",
            state.cache.source().display(),
            e
        );
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    state.cache.get().ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// GET /api/d100/dashboard?country=France&date_from=2011-01-01&date_to=2011-01-31
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(request): Query<DashboardRequest>,
) -> Result<Json<DashboardResponse>, StatusCode> {
    tracing::info!(
        "D100 Dashboard: Getting dashboard for country={:?} {:?}..={:?}",
        request.country,
        request.date_from,
        request.date_to
    );

    let canonical = dataset(&state).await?;

    match service::get_dashboard(canonical, &request, &state.settings) {
        Ok(response) => {
            tracing::info!(
                "D100 Dashboard: Returning {} rows for {} (empty={})",
                response.row_count,
                response.criteria.country,
                response.is_empty
            );
            Ok(Json(response))
        }
        Err(e @ DashboardError::NoDefaultCriteria) => {
            tracing::warn!("D100 Dashboard: {}", e);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// GET /api/d100/filter_options
pub async fn get_filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptions>, StatusCode> {
    let canonical = dataset(&state).await?;
    let options = service::get_filter_options(canonical);
    tracing::info!(
        "D100 Dashboard: Returning {} countries",
        options.countries.len()
    );
    Ok(Json(options))
}
