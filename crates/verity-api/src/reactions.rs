use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use verity_types::api::{Claims, ReactRequest, ReactionResponse};
use verity_types::models::ReactionKind;

use crate::auth::AppState;
use crate::error::{ApiError, require_field};

/// Toggle the acting user's like/dislike on a post. The recomputed sets come
/// back in full so clients can render without a follow-up fetch.
pub async fn react_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ReactRequest>,
) -> Result<Json<ReactionResponse>, ApiError> {
    let action = require_field(&req.action, "Action is required")?;
    let kind: ReactionKind = action
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid action".into()))?;

    let now = chrono::Utc::now().timestamp_millis();

    let (likes, dislikes) = state
        .db
        .toggle_reaction(&post_id.to_string(), &claims.sub.to_string(), kind, now)?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;

    Ok(Json(ReactionResponse { likes, dislikes }))
}
