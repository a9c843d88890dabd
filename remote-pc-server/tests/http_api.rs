use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use async_trait::async_trait;
use axum::Router;
use remote_pc_dispatch::Dispatcher;
use remote_pc_executor::os::input::KeyInjector;
use remote_pc_executor::os::keys::KeyCode;
use remote_pc_executor::os::recording::RecordingBackend;
use remote_pc_executor::os::OsResult;
use remote_pc_executor::{ActionExecutor, Backends, KeyTiming, Platform};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn build_app() -> (Router, Arc<RecordingBackend>) {
    let backend = RecordingBackend::new();
    let executor = ActionExecutor::new(Platform::Windows, backend.backends(), KeyTiming::instant());
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(executor)));
    (remote_pc_server::router(dispatcher), backend)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_volume_up_with_query_steps() {
    let (app, backend) = build_app();

    let (status, body) = send(app, get("/api/volume/up?steps=3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["steps"], 3);
    assert_eq!(body["action"], "volume_up");
    let downs = backend
        .events()
        .iter()
        .filter(|event| *event == "down 0xaf")
        .count();
    assert_eq!(downs, 3);
}

#[tokio::test]
async fn test_unparsable_steps_means_one() {
    let (app, backend) = build_app();

    let (status, body) = send(app, get("/api/brightness/down?steps=lots")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"], 1);
    assert_eq!(backend.events(), vec!["down 0xe8", "up 0xe8"]);
}

#[tokio::test]
async fn test_kill_without_name_is_rejected() {
    let (app, backend) = build_app();

    let (status, body) = send(app, post_json("/api/app/kill", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("name"));
    assert_eq!(body["example"], json!({"name": "notepad.exe"}));
    assert!(backend.events().is_empty());
}

#[tokio::test]
async fn test_close_targets_explicit_handle() {
    let (app, backend) = build_app();

    let (status, body) = send(app, get("/api/window/close?hwnd=12345")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hwnd"], 12345);
    assert_eq!(backend.events(), vec!["close 0x3039"]);
}

#[tokio::test]
async fn test_unknown_action_lists_available() {
    let (app, _backend) = build_app();

    let (status, body) = send(app, get("/api/media/rewind")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["available_actions"],
        json!(["play", "pause", "stop", "next", "previous"])
    );
}

#[tokio::test]
async fn test_unknown_category_and_route_are_not_found() {
    let (app, _backend) = build_app();
    let (status, body) = send(app, get("/api/printer/print")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (app, _backend) = build_app();
    let (status, body) = send(app, get("/nothing/here")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found: /nothing/here");
}

#[tokio::test]
async fn test_custom_hotkey_string_and_array_match() {
    let (app, backend) = build_app();
    let (status, _) = send(app, post_json("/api/hotkey/custom", json!({"keys": "[17,67]"}))).await;
    assert_eq!(status, StatusCode::OK);
    let from_string = backend.events();

    let (app, backend) = build_app();
    let (status, body) = send(app, post_json("/api/hotkey/custom", json!({"keys": [17, 67]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["keys"], json!([17, 67]));

    assert_eq!(from_string, backend.events());
    assert_eq!(
        from_string,
        vec!["down 0x11", "down 0x43", "up 0x43", "up 0x11"]
    );
}

#[tokio::test]
async fn test_malformed_keys_is_rejected() {
    let (app, backend) = build_app();

    let (status, body) = send(app, post_json("/api/hotkey/custom", json!({"keys": "ctrl+c"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(backend.events().is_empty());
}

#[tokio::test]
async fn test_form_body_is_accepted() {
    let (app, backend) = build_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/system/restart")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("force=true"))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "restart");
    assert_eq!(backend.events(), vec!["run shutdown /r /t 0 /f"]);
}

#[tokio::test]
async fn test_malformed_json_body_falls_back_to_query() {
    let (app, _backend) = build_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/volume/down?steps=2")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{broken"))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"], 2);
}

#[tokio::test]
async fn test_failed_action_maps_to_bad_request() {
    let (app, backend) = build_app();
    backend.set_foreground(None);

    let (status, body) = send(app, get("/api/window/info")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body.get("window").is_none());
}

#[tokio::test]
async fn test_cors_headers_and_preflight() {
    let (app, _backend) = build_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/volume/up")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let (app, _backend) = build_app();
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_diagnostic_endpoints() {
    let (app, _backend) = build_app();
    let (status, body) = send(app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["api_info"], "/api/info");

    let (app, _backend) = build_app();
    let (status, body) = send(app, post_json("/api/test?source=phone", json!({"ping": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "POST");
    assert_eq!(body["server_status"], "online");
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["data_received"], json!({"ping": "1", "source": "phone"}));
    assert!(body["timestamp"].as_f64().unwrap() > 0.0);

    let (app, _backend) = build_app();
    let (status, body) = send(app, get("/api/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server_info"]["platform"], "windows");
    assert_eq!(body["server_info"]["supported_methods"], json!(["GET", "POST"]));
    assert!(body["categories"]["window"]["endpoints"]
        .as_array()
        .unwrap()
        .contains(&json!("/api/window/close")));
}

#[tokio::test]
async fn test_wrong_method_gets_json_envelope() {
    for (method, uri) in [
        (Method::PUT, "/api/volume/up"),
        (Method::DELETE, "/api/app/kill"),
        (Method::POST, "/api/info"),
        (Method::PATCH, "/"),
    ] {
        let (app, backend) = build_app();
        let request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            format!("Method {method} not allowed on {uri}")
        );
        assert!(backend.events().is_empty());
    }
}

#[tokio::test]
async fn test_undecodable_path_gets_json_envelope() {
    let (app, backend) = build_app();

    let (status, body) = send(app, get("/api/volume/%FF")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("UTF-8"));
    assert!(backend.events().is_empty());
}

struct PanickingKeys;

#[async_trait]
impl KeyInjector for PanickingKeys {
    async fn key_down(&self, _code: KeyCode) -> OsResult<()> {
        panic!("injector crashed");
    }

    async fn key_up(&self, _code: KeyCode) -> OsResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_panicking_action_maps_to_server_error() {
    let backend = RecordingBackend::new();
    let backends = Backends {
        keys: Arc::new(PanickingKeys),
        ..backend.backends()
    };
    let executor = ActionExecutor::new(Platform::Windows, backends, KeyTiming::instant());
    let app = remote_pc_server::router(Arc::new(Dispatcher::new(Arc::new(executor))));

    let (status, body) = send(app, get("/api/volume/up")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server error: action execution panicked");
}
