use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Registry, TextEncoder};

#[derive(Clone)]
pub struct PosMetrics {
    pub registry: Registry,
    pub http_errors_total: IntCounterVec,
}

impl PosMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let http_errors_total = IntCounterVec::new(
            prometheus::Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)",
            ),
            &["code", "status"],
        )
        .expect("valid metric definition");
        let _ = registry.register(Box::new(http_errors_total.clone()));
        PosMetrics {
            registry,
            http_errors_total,
        }
    }
}

impl Default for PosMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts error responses by their stable `X-Error-Code`.
pub async fn error_metrics_mw(
    State(metrics): State<Arc<PosMetrics>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let resp = next.run(req).await;
    let status = resp.status();
    if status.as_u16() >= 400 {
        let code = resp
            .headers()
            .get("x-error-code")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        metrics
            .http_errors_total
            .with_label_values(&[code, status.as_str()])
            .inc();
    }
    resp
}

pub async fn metrics_endpoint(
    State(state): State<crate::AppState>,
) -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let families = state.metrics.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buf) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        StatusCode::OK,
        String::from_utf8_lossy(&buf).to_string(),
    )
}
