use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::time::Instant;

use crate::logging::HttpLogFormatter;

/// Client IP from the usual proxy headers
pub fn get_real_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(header_value) = forwarded_for.to_str() {
            // X-Forwarded-For may carry a chain, the first hop is the client
            if let Some(first_ip) = header_value.split(',').next() {
                let ip = first_ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// One log line per HTTP request
pub async fn simple_http_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let real_ip = get_real_ip(request.headers());

    let response = next.run(request).await;

    let log_message = HttpLogFormatter::format_request(
        &method,
        &uri,
        response.status().as_u16(),
        start.elapsed(),
        real_ip.as_deref(),
    );

    tracing::info!("{}", log_message);

    response
}
