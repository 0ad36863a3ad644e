use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use crate::expiry::Urgency;
use crate::models::Member;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kutum Family Chatbot API",
        version = "0.1.0",
        description = "Family-management assistant: questions about the household and expiry dates read off document scans.",
    ),
    paths(
        handlers::root::root,
        handlers::root::health_check,
        handlers::chat::chat,
        handlers::members::update_members,
        handlers::documents::scan_document,
        handlers::documents::check_expiring_documents,
    ),
    components(schemas(
        Member,
        Urgency,
        dto::RootResponse,
        dto::HealthResponse,
        dto::ChatRequest,
        dto::ChatResponse,
        dto::UpdateMembersResponse,
        dto::ScanDocumentResponse,
        dto::ExpiringDocumentsResponse,
    )),
    tags(
        (name = "status", description = "Service banner and health"),
        (name = "chat", description = "Questions about the family"),
        (name = "members", description = "Retained member list"),
        (name = "documents", description = "Document expiry scanning"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
