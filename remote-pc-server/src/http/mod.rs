//! HTTP transport: maps `/api/{category}/{action}` onto the dispatcher.

pub mod cors;
pub mod diagnostics;
pub mod request;
pub mod response;

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, Uri};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use remote_pc_dispatch::{DispatchError, Dispatcher};
use response::{ActionResponse, ApiError};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state for HTTP handlers.
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    let state = Arc::new(AppState { dispatcher });

    Router::new()
        .route(
            "/",
            get(diagnostics::index)
                .post(diagnostics::index)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/test",
            get(diagnostics::echo)
                .post(diagnostics::echo)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/info",
            get(diagnostics::info).fallback(method_not_allowed),
        )
        .route(
            "/api/:category/:action",
            get(action).post(action).fallback(method_not_allowed),
        )
        .fallback(fallback)
        .layer(middleware::from_fn(cors::cors))
        .with_state(state)
}

async fn action(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<ActionResponse, ApiError> {
    let Path((category, action)) = path.map_err(|rejection| {
        warn!("Rejected request path: {}", rejection.body_text());
        DispatchError::validation(rejection.body_text())
    })?;
    info!("{} /api/{}/{}", method, category, action);

    let params = request::request_params(&method, &headers, query.as_deref(), &body);
    let result = state.dispatcher.invoke(&category, &action, &params).await?;

    Ok(ActionResponse(result))
}

async fn fallback(uri: Uri) -> Response {
    response::not_found(uri.path())
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    response::method_not_allowed(&method, uri.path())
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, dispatcher: Arc<Dispatcher>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;

    info!("Remote PC server listening on http://{}", local);
    info!("API info: http://{}/api/info", local);
    info!("Connectivity test: http://{}/api/test", local);

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}
