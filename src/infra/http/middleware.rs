use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::{application::error::ErrorReport, presentation::views::IMAGE_FORMAT_HEADER};

/// Run each request inside a `card_request` span keyed by a fresh request id,
/// so render logs emitted by the pipeline carry it too. Served cards are
/// logged with their raster format; failures with the diagnostics of the
/// [`ErrorReport`] they carry, which is consumed here.
pub async fn trace_cards(request: Request<Body>, next: Next) -> Response {
    let span = info_span!(
        target: "thoughtcard::http",
        "card_request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    let query = request.uri().query().unwrap_or_default().to_string();
    let start = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;
    let elapsed_ms = start.elapsed().as_millis();
    let status = response.status();

    span.in_scope(|| {
        if status.is_success() {
            log_served(&response, status, elapsed_ms);
        } else if status.is_client_error() || status.is_server_error() {
            let report = response.extensions_mut().remove::<ErrorReport>();
            log_failed(report, status, &query, elapsed_ms);
        }
    });

    response
}

fn log_served(response: &Response, status: StatusCode, elapsed_ms: u128) {
    let Some(format) = response
        .headers()
        .get(IMAGE_FORMAT_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return;
    };
    debug!(
        target = "thoughtcard::http::response",
        status = status.as_u16(),
        format = format,
        elapsed_ms = elapsed_ms,
        "card served",
    );
}

fn log_failed(report: Option<ErrorReport>, status: StatusCode, query: &str, elapsed_ms: u128) {
    let (source, messages) = match report {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = messages
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");

    if status.is_server_error() {
        error!(
            target = "thoughtcard::http::response",
            status = status.as_u16(),
            query = query,
            elapsed_ms = elapsed_ms,
            source = source,
            detail = detail,
            chain = ?messages,
            "card render failed",
        );
    } else {
        warn!(
            target = "thoughtcard::http::response",
            status = status.as_u16(),
            query = query,
            elapsed_ms = elapsed_ms,
            source = source,
            detail = detail,
            "card request rejected",
        );
    }
}
