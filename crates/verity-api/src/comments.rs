use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use verity_types::api::{AddCommentRequest, AddCommentResponse, Claims, CommentResponse};

use crate::auth::AppState;
use crate::error::{ApiError, require_field};

/// Append-only: comments are never edited or deleted. The insert is a single
/// store-side append, so no read-modify-write of the comment list happens.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = require_field(&req.comment, "Comment text is required")?;

    let comment_id = Uuid::new_v4();
    let now = chrono::Utc::now().timestamp_millis();

    let appended = state.db.insert_comment(
        &comment_id.to_string(),
        &post_id.to_string(),
        &claims.sub.to_string(),
        text,
        now,
    )?;
    if !appended {
        return Err(ApiError::NotFound("Post not found".into()));
    }

    Ok((
        StatusCode::CREATED,
        Json(AddCommentResponse {
            message: "Comment added successfully".into(),
            comment: CommentResponse {
                username: claims.username,
                email: claims.email,
                text: text.to_string(),
                timestamp: now,
            },
        }),
    ))
}

pub async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .db
        .get_comments(&post_id.to_string())?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;

    let comments: Vec<CommentResponse> = rows
        .into_iter()
        .map(|c| CommentResponse {
            username: c.author_username,
            email: c.author_email,
            text: c.body,
            timestamp: c.created_at,
        })
        .collect();

    Ok(Json(serde_json::json!({ "comments": comments })))
}
