//! Collapse query strings and request bodies into one `Params` bag.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use remote_pc_dispatch::Params;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

fn parse_urlencoded(raw: &[u8]) -> Params {
    form_urlencoded::parse(raw).into_owned().collect()
}

pub fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok())
}

/// Parse a request body. Malformed or non-object bodies are ignored.
pub fn body_params(headers: &HeaderMap, body: &[u8]) -> Params {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Params::new();
    }

    let is_form = content_type(headers)
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    if is_form {
        return parse_urlencoded(body);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Params::from_json_object(&object),
        Ok(other) => {
            warn!("Ignoring non-object JSON body: {}", other);
            Params::new()
        }
        Err(e) => {
            warn!("Ignoring unparsable request body: {}", e);
            Params::new()
        }
    }
}

/// GET reads the query string only. Other methods start from the query
/// string and let body fields override it.
pub fn request_params(
    method: &Method,
    headers: &HeaderMap,
    query: Option<&str>,
    body: &[u8],
) -> Params {
    let mut params = query
        .map(|q| parse_urlencoded(q.as_bytes()))
        .unwrap_or_default();

    if *method != Method::GET && *method != Method::HEAD {
        params.merge(body_params(headers, body));
    }

    debug!("Request params: {:?}", params);
    params
}
