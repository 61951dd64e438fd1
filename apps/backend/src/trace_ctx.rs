//! Task-local trace id for the HTTP request being served.
//!
//! `RequestTrace` opens the scope; `AppError` reads it when rendering a
//! problem response. WebSocket frames carry no trace id.

use std::future::Future;

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

const UNKNOWN: &str = "unknown";

/// Current request's trace id, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
