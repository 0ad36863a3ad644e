use axum::{extract::State, Json};

use crate::api::dto::{ChatRequest, ChatResponse};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::Result;
use crate::services::ChatQuery;

use super::iso_timestamp;

/// `POST /api/chat`
///
/// Ranks the household's members against the question and answers with the
/// language model when one is configured, falling back to rule-based answers
/// whenever the model is missing or fails.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer to the question", body = ChatResponse),
        (status = 400, description = "Missing or empty message"),
        (status = 500, description = "Unexpected internal failure"),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let query = ChatQuery::from_payload(
        request.message,
        request.members.as_deref(),
        request.all_data.as_ref(),
    );

    let outcome = state.chat.answer(query).await?;

    Ok(Json(ChatResponse {
        response: outcome.response,
        relevant_members: outcome
            .relevant_members
            .into_iter()
            .map(|member| member.name)
            .collect(),
        timestamp: iso_timestamp(),
    }))
}
