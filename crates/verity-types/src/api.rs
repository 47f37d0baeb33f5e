use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserSummary;

// -- JWT Claims --

/// JWT claims shared between verity-api (REST middleware) and verity-server.
/// Canonical definition lives here in verity-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub exp: usize,
}

// -- Auth --
//
// Request fields are `Option` so that field-presence validation happens in the
// handlers and maps to 400, rather than a deserialization rejection. Legacy
// clients also send extra fields (e.g. `followerEmail`); those are ignored.

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserInfo,
}

// -- Posts --

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Base64-encoded inline media payload.
    pub media: Option<String>,
    #[serde(rename = "mediaType")]
    pub media_type: Option<String>,
}

/// Confirmation echo returned on creation; not the full stored document.
#[derive(Debug, Serialize)]
pub struct PostEcho {
    pub post_id: Uuid,
    pub username: String,
    pub email: String,
    pub title: String,
    pub content: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub message: String,
    pub post: PostEcho,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post_id: Uuid,
    pub username: String,
    pub email: String,
    pub title: String,
    pub content: String,
    pub timestamp: i64,
    /// Emails of reacting users. Set semantics; ordering is not meaningful.
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
    pub comments: Vec<CommentResponse>,
    pub media: Option<String>,
    #[serde(rename = "mediaType")]
    pub media_type: Option<String>,
}

// -- Reactions --

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReactionResponse {
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub username: String,
    pub email: String,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct AddCommentResponse {
    pub message: String,
    pub comment: CommentResponse,
}

// -- Follow graph --

#[derive(Debug, Deserialize)]
pub struct FollowToggleRequest {
    #[serde(rename = "targetEmail")]
    pub target_email: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestedUsersResponse {
    pub suggested: Vec<UserSummary>,
}
