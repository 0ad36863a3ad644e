use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::KutumError;

/// `axum::Json` whose rejections render as [`KutumError::Validation`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(KutumError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for KutumError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> KutumError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                KutumError::Validation(format!("Missing required field: {field}"))
            } else {
                KutumError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            KutumError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            KutumError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            KutumError::Validation("Failed to read request body".to_string())
        }
        _ => KutumError::Validation(rejection.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
