use std::any::Any;

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::{errors::AppError, models::ErrorBody};

/// Same cap axum applies to JSON bodies.
const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

// Cross-origin requests are accepted from anywhere
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin)
}

/// Logs method, uri and the raw request body, then hands the buffered body on.
/// Only mounted when `LOG_BODIES` is enabled.
pub async fn log_body_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_LOGGED_BODY)
        .await
        .map_err(|e| {
            tracing::warn!("Failed to buffer body for {} {}: {}", parts.method, parts.uri, e);
            StatusCode::PAYLOAD_TOO_LARGE
        })?;

    if bytes.is_empty() {
        tracing::debug!("[{}] {}", parts.method, parts.uri);
    } else {
        tracing::debug!(
            "[{}] {} {}",
            parts.method,
            parts.uri,
            String::from_utf8_lossy(&bytes)
        );
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

/// Turns a panicking handler into a generic 500 instead of a dropped connection.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    let (status, msg) = AppError::InternalError.to_response();
    (status, Json(ErrorBody::new(msg))).into_response()
}
