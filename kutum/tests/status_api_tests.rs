mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use common::{app, body_json, get_request, json_request, llm_config, offline_app, test_config};

#[tokio::test]
async fn root_reports_rule_based_mode_without_llm() {
    let response = offline_app().oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "message": "Kutum Family Chatbot API",
            "status": "running",
            "openai_enabled": false,
            "mode": "Rule-based"
        })
    );
}

#[tokio::test]
async fn root_reports_llm_mode_when_configured() {
    let app = app(test_config(
        Some(llm_config("http://127.0.0.1:9/v1".to_string())),
        None,
    ));

    let body = body_json(app.oneshot(get_request("/")).await.unwrap()).await;

    assert_eq!(body["openai_enabled"], true);
    assert_eq!(body["mode"], "OpenAI GPT");
}

#[tokio::test]
async fn health_is_healthy() {
    let response = offline_app().oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["openai_enabled"], false);
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
}

#[tokio::test]
async fn update_members_counts_normalized_records() {
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/api/update-members",
            json!([
                {"id": "1", "name": "Raj", "relation": "Son", "age": "12"},
                {"id": "2", "name": "Mina", "relation": "Daughter", "age": "8"},
                {"id": "3", "relation": "Cousin"}
            ]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "success", "count": 2})
    );
}

#[tokio::test]
async fn update_members_rejects_non_array() {
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/api/update-members",
            json!({"name": "Raj"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_expiring_documents_is_placeholder() {
    let response = offline_app()
        .oneshot(get_request("/api/check-expiring-documents"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "message": "This endpoint will check database for expiring documents",
            "note": "Implement after database integration"
        })
    );
}

#[tokio::test]
async fn openapi_json_lists_the_surface() {
    let response = offline_app()
        .oneshot(get_request("/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let version = json["openapi"]
        .as_str()
        .expect("openapi field should be a string");
    assert!(version.starts_with('3'), "unexpected OpenAPI version {version}");

    for route in [
        "/",
        "/health",
        "/api/chat",
        "/api/update-members",
        "/api/scan-document",
        "/api/check-expiring-documents",
    ] {
        assert!(json["paths"].get(route).is_some(), "missing path {route}");
    }
}

#[tokio::test]
async fn docs_page_is_served() {
    let response = offline_app().oneshot(get_request("/docs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let response = offline_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/chat")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
}

#[tokio::test]
async fn wildcard_cors_origin_is_skipped() {
    let mut config = test_config(None, None);
    config.server.cors_origins = vec!["*".to_string(), "http://localhost:5173".to_string()];

    let response = app(config)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn cors_ignores_unknown_origin() {
    let response = offline_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = offline_app().oneshot(get_request("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
