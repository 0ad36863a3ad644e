use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::dto::UpdateMembersResponse;
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::models::Member;

/// `POST /api/update-members`
///
/// Replaces the retained member list. Entries without a name are dropped and
/// not counted.
#[utoipa::path(
    post,
    path = "/api/update-members",
    tag = "members",
    request_body(content = Vec<Member>, description = "Full member list"),
    responses(
        (status = 200, description = "Members retained", body = UpdateMembersResponse),
        (status = 400, description = "Body is not a JSON array"),
    )
)]
pub async fn update_members(
    State(state): State<AppState>,
    AppJson(members): AppJson<Vec<Value>>,
) -> Json<UpdateMembersResponse> {
    let count = state.store.replace(Member::normalize_all(&members)).await;

    Json(UpdateMembersResponse {
        status: "success".to_string(),
        count,
    })
}
