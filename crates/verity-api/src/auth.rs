use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use verity_db::Database;
use verity_types::api::{
    AuthResponse, Claims, LoginRequest, MeResponse, SignupRequest, UserInfo,
};

use crate::error::{ApiError, require_field};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let msg = "Username, email, and password are required";
    let username = require_field(&req.username, msg)?;
    let email = require_field(&req.email, msg)?;
    let password = require_field(&req.password, msg)?;

    if state.db.get_user_by_email(email)?.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }
    if state.db.get_user_by_username(username)?.is_some() {
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow!("password hash failed: {}", e)))?
        .to_string();

    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now().timestamp_millis();

    state
        .db
        .create_user(&user_id.to_string(), username, email, &password_hash, now)?;

    let token = create_token(&state.jwt_secret, user_id, username, email)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".into(),
            token,
            user: UserInfo {
                id: user_id,
                username: username.to_string(),
                email: email.to_string(),
            },
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let msg = "Email and password are required";
    let email = require_field(&req.email, msg)?;
    let password = require_field(&req.password, msg)?;

    // Same response for unknown email and wrong password.
    let invalid = || ApiError::Unauthorized("Invalid email or password".into());

    let user = state.db.get_user_by_email(email)?.ok_or_else(invalid)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Internal(anyhow!("stored hash unparseable: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::Internal(anyhow!("corrupt user id '{}': {}", user.id, e)))?;

    let token = create_token(&state.jwt_secret, user_id, &user.username, &user.email)?;

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: UserInfo {
            id: user_id,
            username: user.username,
            email: user.email,
        },
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::Internal(anyhow!("corrupt user id '{}': {}", user.id, e)))?;

    Ok(Json(MeResponse {
        user: UserInfo {
            id: user_id,
            username: user.username,
            email: user.email,
        },
    }))
}

/// Token invalidation is client-side; this is a stateless acknowledgement.
pub async fn logout() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Logout successful" }))
}

fn create_token(secret: &str, user_id: Uuid, username: &str, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
