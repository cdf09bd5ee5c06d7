use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Имя маршрута для логов; всё, что не совпало с роутером, это `unmatched`.
pub fn route_name(path: &str) -> &'static str {
    match path {
        "/health" => "health",
        "/api/d100/dashboard" => "d100.dashboard",
        "/api/d100/filter_options" => "d100.filter_options",
        _ => "unmatched",
    }
}

/// Middleware для логирования HTTP запросов
///
/// Одна запись `tracing` на запрос: маршрут, метод, путь, статус,
/// длительность (ms) и размер ответа. 5xx идут в error, 4xx в warn.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = route_name(&path);

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();
    let status = parts.status;

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                route,
                method = %method,
                path = %path,
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Response body unreadable: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let size = format_number(bytes.len() as u64);

    macro_rules! log_request {
        ($level:ident) => {
            tracing::$level!(
                route,
                method = %method,
                path = %path,
                status = status.as_u16(),
                elapsed_ms,
                size = %size,
                "{} {} {}",
                status.as_u16(),
                method,
                path
            )
        };
    }

    if status.is_server_error() {
        log_request!(error);
    } else if status.is_client_error() {
        log_request!(warn);
    } else {
        log_request!(info);
    }

    Response::from_parts(parts, Body::from(bytes))
}
