//! JSON envelopes and status mapping.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use remote_pc_dispatch::DispatchError;
use remote_pc_executor::ActionResult;
use serde_json::{json, Value};

/// 200 when the action succeeded, 400 when it reported a failure.
pub struct ActionResponse(pub ActionResult);

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        let status = if self.0.success {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, Json(self.0)).into_response()
    }
}

pub struct ApiError(pub DispatchError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DispatchError::Validation { .. } | DispatchError::UnknownAction { .. } => {
                StatusCode::BAD_REQUEST
            }
            DispatchError::UnknownCategory { .. } => StatusCode::NOT_FOUND,
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        let message = self.0.to_string();
        match &self.0 {
            DispatchError::Validation {
                example: Some(example),
                ..
            } => json!({"success": false, "message": message, "example": example}),
            DispatchError::Validation { example: None, .. } => {
                json!({"success": false, "message": message})
            }
            DispatchError::UnknownAction { available, .. } => {
                json!({"success": false, "message": message, "available_actions": available})
            }
            DispatchError::UnknownCategory { available, .. } => {
                json!({"success": false, "message": message, "available_categories": available})
            }
            DispatchError::Internal(detail) => {
                json!({"success": false, "message": format!("Server error: {detail}")})
            }
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

pub fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": format!("Not found: {path}"),
            "api_info": "/api/info"
        })),
    )
        .into_response()
}

pub fn method_not_allowed(method: &Method, path: &str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "success": false,
            "message": format!("Method {method} not allowed on {path}"),
            "api_info": "/api/info"
        })),
    )
        .into_response()
}
