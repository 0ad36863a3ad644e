//! Request and response bodies of the HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::expiry::{ExpiryExtraction, Urgency};

pub const SCAN_NOT_FOUND_MESSAGE: &str =
    "Could not find an expiry date in this document. You can add it manually.";
pub const SCAN_NOT_FOUND_ERROR: &str = "No expiry date found in document";
pub const SCAN_NOT_CONFIGURED_ERROR: &str =
    "Vision model not configured. Set VISION_API_KEY or OPENAI_API_KEY.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub openai_enabled: bool,
    /// `OpenAI GPT` when a language model answers questions, else `Rule-based`.
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// ISO-8601 local time.
    pub timestamp: String,
    pub openai_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// Legacy member list. Entries without a name are ignored.
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub members: Option<Vec<Value>>,
    /// Full household snapshot: `stats`, `familyMembers`, `documents`,
    /// `vehicles`, `health`, `reminders`.
    #[serde(default, rename = "allData")]
    #[schema(value_type = Option<Object>)]
    pub all_data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    /// Names of the members the question matched, most relevant first.
    pub relevant_members: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateMembersResponse {
    pub status: String,
    pub count: usize,
}

/// Result of scanning one document. Extraction failures are reported here
/// with `success: false`, never as an HTTP error.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ScanDocumentResponse {
    pub success: bool,
    /// `YYYY-MM-DD`, or the model's raw text when it could not be normalized.
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_create_reminder: Option<bool>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanDocumentResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: SCAN_NOT_FOUND_MESSAGE.to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

impl From<ExpiryExtraction> for ScanDocumentResponse {
    fn from(extraction: ExpiryExtraction) -> Self {
        match extraction {
            ExpiryExtraction::Parsed(parsed) => {
                let formatted = parsed.formatted_date();
                let suffix = match parsed.urgency {
                    Urgency::Expired => " (EXPIRED!)",
                    Urgency::High => " (Expires soon!)",
                    Urgency::Medium | Urgency::Low => "",
                };
                Self {
                    success: true,
                    expiry_date: Some(parsed.iso_date()),
                    message: format!("Expiry date found: {formatted}{suffix}"),
                    formatted_date: Some(formatted),
                    days_until_expiry: Some(parsed.days_until_expiry),
                    urgency: Some(parsed.urgency),
                    should_create_reminder: Some(parsed.should_create_reminder),
                    error: None,
                }
            }
            ExpiryExtraction::Unparsed { raw } => Self {
                success: true,
                message: format!("Expiry date found: {raw}"),
                expiry_date: Some(raw),
                should_create_reminder: Some(false),
                ..Default::default()
            },
            ExpiryExtraction::NotFound { .. } => Self::failure(SCAN_NOT_FOUND_ERROR),
            ExpiryExtraction::Failed { error } => Self::failure(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiringDocumentsResponse {
    pub message: String,
    pub note: String,
}
