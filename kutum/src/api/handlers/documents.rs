use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::dto::{
    ExpiringDocumentsResponse, ScanDocumentResponse, SCAN_NOT_CONFIGURED_ERROR,
};
use crate::api::state::AppState;
use crate::error::{KutumError, Result};

/// `POST /api/scan-document`
///
/// Accepts a multipart form with a `file` field and an optional
/// `document_type`. Extraction problems come back as `success: false` with
/// status 200; only a malformed upload is rejected.
#[utoipa::path(
    post,
    path = "/api/scan-document",
    tag = "documents",
    request_body(content_type = "multipart/form-data", content = String, description = "Document image in `file`, optional `document_type`"),
    responses(
        (status = 200, description = "Extraction result", body = ScanDocumentResponse),
        (status = 400, description = "Missing or unreadable file"),
    )
)]
pub async fn scan_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanDocumentResponse>> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| KutumError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| KutumError::Validation(format!("Failed to read file: {e}")))?;
                file_bytes = Some(bytes.to_vec());
            }
            "document_type" | "documentType" => {
                let text = field.text().await.map_err(|e| {
                    KutumError::Validation(format!("Invalid document_type: {e}"))
                })?;
                document_type = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    let bytes = file_bytes
        .ok_or_else(|| KutumError::Validation("Missing required 'file' field".to_string()))?;
    if bytes.is_empty() {
        return Err(KutumError::Validation("Uploaded file is empty".to_string()));
    }

    if !state.scanner.vision_enabled() {
        tracing::warn!("Document scan requested but no vision model is configured");
        return Ok(Json(ScanDocumentResponse::failure(SCAN_NOT_CONFIGURED_ERROR)));
    }

    let extraction = state.scanner.scan(&bytes, document_type.as_deref()).await;
    Ok(Json(ScanDocumentResponse::from(extraction)))
}

/// `GET /api/check-expiring-documents`
///
/// Placeholder until documents are persisted server-side.
#[utoipa::path(
    get,
    path = "/api/check-expiring-documents",
    tag = "documents",
    responses(
        (status = 200, description = "Placeholder body", body = ExpiringDocumentsResponse),
    )
)]
pub async fn check_expiring_documents() -> Json<ExpiringDocumentsResponse> {
    Json(ExpiringDocumentsResponse {
        message: "This endpoint will check database for expiring documents".to_string(),
        note: "Implement after database integration".to_string(),
    })
}
