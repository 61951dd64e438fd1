use std::env;

use actix_cors::Cors;
use actix_web::http::header;

const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Origins from `CORS_ALLOWED_ORIGINS` (comma-separated); entries that are
/// empty, `null`, or not http(s) are dropped. Falls back to localhost.
pub fn allowed_origins() -> Vec<String> {
    let raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}

/// The server only exposes GET endpoints plus the WebSocket upgrade.
pub fn cors_middleware() -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in allowed_origins() {
        cors = cors.allowed_origin(&origin);
    }
    cors
}
