use std::collections::HashMap;

use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::warn;
use uuid::Uuid;

use verity_db::models::{CommentRow, PostRow, ReactionRow};
use verity_types::api::{
    Claims, CommentResponse, CreatePostRequest, CreatePostResponse, PostEcho, PostResponse,
};

use crate::auth::AppState;
use crate::error::{ApiError, require_field};

pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let msg = "Title and content are required";
    let title = require_field(&req.title, msg)?;
    let content = require_field(&req.content, msg)?;

    let media = req
        .media
        .as_deref()
        .filter(|m| !m.is_empty())
        .map(|m| B64.decode(m))
        .transpose()
        .map_err(|_| ApiError::BadRequest("Media must be valid base64".into()))?;

    let post_id = Uuid::new_v4();
    let now = chrono::Utc::now().timestamp_millis();

    state.db.insert_post(
        &post_id.to_string(),
        &claims.sub.to_string(),
        title,
        content,
        media.as_deref(),
        req.media_type.as_deref(),
        now,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Post added successfully".into(),
            post: PostEcho {
                post_id,
                username: claims.username,
                email: claims.email,
                title: title.to_string(),
                content: content.to_string(),
                timestamp: now,
            },
        }),
    ))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    // Run blocking DB queries off the async runtime
    let db = state.clone();
    let posts = tokio::task::spawn_blocking(move || {
        let rows = db.db.get_posts()?;
        let post_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let reactions = db.db.get_reactions_for_posts(&post_ids)?;
        let comments = db.db.get_comments_for_posts(&post_ids)?;
        Ok::<_, anyhow::Error>(build_post_responses(rows, reactions, comments))
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow!("spawn_blocking join error: {}", e)))??;

    Ok(Json(serde_json::json!({ "posts": posts })))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let id = post_id.to_string();
    let row = state
        .db
        .get_post(&id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;

    let reactions = state.db.get_reactions_for_posts(std::slice::from_ref(&id))?;
    let comments = state.db.get_comments_for_posts(std::slice::from_ref(&id))?;

    let mut posts = build_post_responses(vec![row], reactions, comments);
    Ok(Json(posts.remove(0)))
}

pub async fn user_posts(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let posts = tokio::task::spawn_blocking(move || {
        let rows = db.db.get_posts_by_author_email(&email)?;
        let post_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let reactions = db.db.get_reactions_for_posts(&post_ids)?;
        let comments = db.db.get_comments_for_posts(&post_ids)?;
        Ok::<_, anyhow::Error>(build_post_responses(rows, reactions, comments))
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow!("spawn_blocking join error: {}", e)))??;

    Ok(Json(serde_json::json!({ "posts": posts })))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let id = post_id.to_string();
    let post = state
        .db
        .get_post(&id)?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;

    if post.author_email != claims.email {
        return Err(ApiError::Forbidden(
            "You can only delete your own posts".into(),
        ));
    }

    if !state.db.delete_post(&id)? {
        return Err(ApiError::NotFound("Post not found".into()));
    }

    Ok(Json(serde_json::json!({ "message": "Post deleted successfully" })))
}

/// Join posts with their grouped reactions and comments.
/// Reaction lists carry set semantics; ordering is incidental.
fn build_post_responses(
    rows: Vec<PostRow>,
    reactions: Vec<ReactionRow>,
    comments: Vec<CommentRow>,
) -> Vec<PostResponse> {
    let mut reaction_map: HashMap<String, (Vec<String>, Vec<String>)> = HashMap::new();
    for r in reactions {
        let sets = reaction_map.entry(r.post_id).or_default();
        if r.kind == "like" {
            sets.0.push(r.user_email);
        } else {
            sets.1.push(r.user_email);
        }
    }

    let mut comment_map: HashMap<String, Vec<CommentResponse>> = HashMap::new();
    for c in comments {
        comment_map.entry(c.post_id.clone()).or_default().push(CommentResponse {
            username: c.author_username,
            email: c.author_email,
            text: c.body,
            timestamp: c.created_at,
        });
    }

    rows.into_iter()
        .map(|row| {
            let (likes, dislikes) = reaction_map.remove(&row.id).unwrap_or_default();
            let comments = comment_map.remove(&row.id).unwrap_or_default();

            PostResponse {
                post_id: row.id.parse().unwrap_or_else(|e| {
                    warn!("Corrupt post id '{}': {}", row.id, e);
                    Uuid::default()
                }),
                username: row.author_username,
                email: row.author_email,
                title: row.title,
                content: row.content,
                timestamp: row.created_at,
                likes,
                dislikes,
                comments,
                media: row.media.as_deref().map(|m| B64.encode(m)),
                media_type: row.media_type,
            }
        })
        .collect()
}
