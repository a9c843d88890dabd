//! Introspection endpoints: `/`, `/api/test`, `/api/info`.

use super::request::{content_type, request_params};
use super::AppState;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method};
use axum::Json;
use remote_pc_dispatch::Category;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Remote PC control API server",
        "api_info": "/api/info",
        "test_endpoint": "/api/test",
        "status": "running"
    }))
}

/// Echo back what the server understood from the request.
pub async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Json<Value> {
    let params = request_params(&method, &headers, query.as_deref(), &body);
    let header_map: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).to_string()),
            )
        })
        .collect();
    let timestamp = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;

    Json(json!({
        "success": true,
        "message": "API service is running",
        "method": method.as_str(),
        "data_received": params.to_json(),
        "timestamp": timestamp,
        "server_status": "online",
        "content_type": content_type(&headers),
        "headers": header_map
    }))
}

fn catalog() -> Map<String, Value> {
    Category::ALL
        .iter()
        .map(|category| {
            let endpoints: Vec<String> = category
                .actions()
                .iter()
                .map(|action| format!("/api/{category}/{action}"))
                .collect();
            (
                category.as_str().to_string(),
                json!({
                    "endpoints": endpoints,
                    "description": category.description(),
                    "parameters": category.parameters(),
                }),
            )
        })
        .collect()
}

pub async fn info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let platform = state.dispatcher.executor().platform();
    Json(json!({
        "success": true,
        "message": "Remote PC control API",
        "server_info": {
            "version": env!("CARGO_PKG_VERSION"),
            "platform": platform.as_str(),
            "supported_methods": ["GET", "POST"],
            "content_types": [
                "application/json",
                "application/x-www-form-urlencoded",
                "query_params"
            ],
            "note": "GET requests read query parameters; POST requests read a JSON or form body on top of the query string"
        },
        "categories": catalog(),
        "examples": {
            "simple_get": "GET /api/volume/up",
            "get_with_params": "GET /api/volume/up?steps=3",
            "post_json": "POST /api/volume/up {\"steps\": 3}",
            "post_form": "POST /api/volume/up (form: steps=3)",
            "custom_hotkey": "POST /api/hotkey/custom {\"keys\": [17, 67]}"
        }
    }))
}
