#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use serde_json::{json, Value};

use kutum::api::{create_router, AppState};
use kutum::config::{AssistantConfig, Config, ExpiryConfig, LlmConfig, ServerConfig, VisionConfig};
use kutum::llm::LlmProvider;
use kutum::vision::VisionProvider;

pub const BOUNDARY: &str = "kutum-test-boundary";

/// JPEG magic bytes followed by filler; enough for mime sniffing.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-3.5-turbo",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

pub fn api_error_body(message: &str, error_type: &str, code: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": Value::Null,
            "code": code
        }
    })
}

pub fn llm_config(base_url: String) -> LlmConfig {
    LlmConfig {
        model: "openai/gpt-3.5-turbo".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        timeout_secs: 5,
        temperature: 0.7,
        max_tokens: 400,
    }
}

pub fn vision_config(base_url: String) -> VisionConfig {
    VisionConfig {
        model: "openai/gpt-4o".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        timeout_secs: 5,
        max_tokens: 100,
    }
}

/// Config that never reads the process environment.
pub fn test_config(llm: Option<LlmConfig>, vision: Option<VisionConfig>) -> Config {
    Config {
        server: ServerConfig::default(),
        llm,
        vision,
        assistant: AssistantConfig::default(),
        expiry: ExpiryConfig::default(),
    }
}

pub fn app(config: Config) -> Router {
    let llm = LlmProvider::new(config.llm.as_ref());
    let vision = VisionProvider::new(config.vision.as_ref());
    create_router(AppState::new(config, llm, vision))
}

pub fn offline_app() -> Router {
    app(test_config(None, None))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Multipart body with an optional `file` part and optional text fields.
pub fn multipart_body(file: Option<&[u8]>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"document.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn scan_request(file: Option<&[u8]>, fields: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/scan-document")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file, fields)))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
