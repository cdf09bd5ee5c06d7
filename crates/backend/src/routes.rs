use axum::http::{header, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::shared::state::AppState;
use crate::system::middleware::request_logger::request_logger;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D100 CUSTOMER INSIGHTS DASHBOARD
        // ========================================
        .route(
            "/api/d100/dashboard",
            get(handlers::d100_customer_insights::get_dashboard),
        )
        .route(
            "/api/d100/filter_options",
            get(handlers::d100_customer_insights::get_filter_options),
        )
        .with_state(state)
}

/// Роуты вместе с логированием запросов и CORS
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    configure_routes(state)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d100_customer_insights::service::DashboardSettings;
    use crate::domain::a001_retail_transaction::{CanonicalDataset, DatasetCache};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use contracts::domain::a001_retail_transaction::Transaction;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let at = |d: u32| {
            NaiveDate::from_ymd_opt(2011, 1, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        };
        let dataset = CanonicalDataset::new(vec![
            Transaction::new("A", "MUG", 2, 5.0, at(1), "100", "UK"),
            Transaction::new("C", "BOWL", 1, 20.0, at(2), "102", "FR"),
        ]);
        build_app(AppState::new(
            Arc::new(DatasetCache::preloaded(dataset)),
            DashboardSettings::default(),
        ))
    }

    async fn request(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = request("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_dashboard_through_layers() {
        let uri = "/api/d100/dashboard?country=FR&date_from=2011-01-01&date_to=2011-01-31";
        let (status, body) = request(uri).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["row_count"], 1);
        assert_eq!(json["criteria"]["country"], "FR");
        assert_eq!(json["kpi"]["total_revenue"], 20.0);
    }

    #[tokio::test]
    async fn test_filter_options_through_layers() {
        let (status, body) = request("/api/d100/filter_options").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["countries"], serde_json::json!(["UK", "FR"]));
    }

    #[tokio::test]
    async fn test_malformed_date_is_bad_request() {
        let (status, _) = request("/api/d100/dashboard?date_from=01.01.2011").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = request("/api/d400/monthly_summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:8080")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
