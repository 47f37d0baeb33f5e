use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use verity_types::api::{Claims, FollowToggleRequest, SuggestedUsersResponse};
use verity_types::models::{FollowAction, UserSummary};

use crate::auth::AppState;
use crate::error::{ApiError, require_field};

const SUGGESTED_LIMIT: u32 = 5;

/// Follow or unfollow a target user. Both directions of the relationship are
/// derived from one stored edge, so repeated follows and redundant unfollows
/// are no-ops rather than errors.
pub async fn follow_toggle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<FollowToggleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target_email = require_field(&req.target_email, "Target email is required")?;
    let action_str = require_field(&req.action, "Action is required")?;
    let action: FollowAction = action_str
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid action".into()))?;

    if target_email == claims.email {
        return Err(ApiError::BadRequest("You cannot follow yourself".into()));
    }

    let target = state
        .db
        .get_user_by_email(target_email)?
        .ok_or_else(|| ApiError::NotFound("Target user not found".into()))?;

    let follower_id = claims.sub.to_string();
    let status = match action {
        FollowAction::Follow => {
            let now = chrono::Utc::now().timestamp_millis();
            state.db.follow(&follower_id, &target.id, now)?;
            "followed"
        }
        FollowAction::Unfollow => {
            state.db.unfollow(&follower_id, &target.id)?;
            "unfollowed"
        }
    };

    Ok(Json(serde_json::json!({ "status": status })))
}

pub async fn get_followers(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let followers: Vec<UserSummary> = state
        .db
        .get_followers(&user.id)?
        .into_iter()
        .map(|row| UserSummary {
            username: row.username,
            email: row.email,
        })
        .collect();

    Ok(Json(serde_json::json!({ "followers": followers })))
}

pub async fn get_following(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let following: Vec<UserSummary> = state
        .db
        .get_following(&user.id)?
        .into_iter()
        .map(|row| UserSummary {
            username: row.username,
            email: row.email,
        })
        .collect();

    Ok(Json(serde_json::json!({ "following": following })))
}

pub async fn suggested_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SuggestedUsersResponse>, ApiError> {
    let suggested: Vec<UserSummary> = state
        .db
        .suggested_users(&claims.sub.to_string(), SUGGESTED_LIMIT)?
        .into_iter()
        .map(|row| UserSummary {
            username: row.username,
            email: row.email,
        })
        .collect();

    Ok(Json(SuggestedUsersResponse { suggested }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::{signup_user, test_state};
    use axum::http::StatusCode;

    async fn toggle(
        state: &AppState,
        who: &Claims,
        target: &str,
        action: &str,
    ) -> Result<(), ApiError> {
        follow_toggle(
            State(state.clone()),
            Extension(who.clone()),
            Json(FollowToggleRequest {
                target_email: Some(target.into()),
                action: Some(action.into()),
            }),
        )
        .await
        .map(|_| ())
    }

    #[tokio::test]
    async fn follow_twice_leaves_one_edge() {
        let state = test_state();
        let alice = signup_user(&state, "alice", "alice@example.com").await;
        let bob = signup_user(&state, "bob", "bob@example.com").await;

        toggle(&state, &alice, "bob@example.com", "follow").await.unwrap();
        toggle(&state, &alice, "bob@example.com", "follow").await.unwrap();

        assert_eq!(state.db.get_followers(&bob.sub.to_string()).unwrap().len(), 1);
        assert_eq!(state.db.get_following(&alice.sub.to_string()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unfollow_without_follow_succeeds_quietly() {
        let state = test_state();
        let alice = signup_user(&state, "alice", "alice@example.com").await;
        signup_user(&state, "bob", "bob@example.com").await;

        toggle(&state, &alice, "bob@example.com", "unfollow").await.unwrap();
    }

    #[tokio::test]
    async fn self_follow_is_rejected() {
        let state = test_state();
        let alice = signup_user(&state, "alice", "alice@example.com").await;

        let err = toggle(&state, &alice, "alice@example.com", "follow").await.err().unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let state = test_state();
        let alice = signup_user(&state, "alice", "alice@example.com").await;

        let err = toggle(&state, &alice, "ghost@example.com", "follow").await.err().unwrap();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let state = test_state();
        let alice = signup_user(&state, "alice", "alice@example.com").await;
        signup_user(&state, "bob", "bob@example.com").await;

        let err = toggle(&state, &alice, "bob@example.com", "befriend").await.err().unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn suggestions_skip_self_and_followed() {
        let state = test_state();
        let alice = signup_user(&state, "alice", "alice@example.com").await;
        signup_user(&state, "bob", "bob@example.com").await;
        signup_user(&state, "carol", "carol@example.com").await;

        toggle(&state, &alice, "bob@example.com", "follow").await.unwrap();

        let Json(body) = suggested_users(State(state), Extension(alice)).await.unwrap();
        let emails: Vec<&str> = body.suggested.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["carol@example.com"]);
    }
}
