use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use verity_api::auth::{self, AppState, AppStateInner};
use verity_api::middleware::require_auth;
use verity_api::{comments, follows, posts, reactions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verity=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("VERITY_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("VERITY_DB_PATH").unwrap_or_else(|_| "verity.db".into());
    let host = std::env::var("VERITY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VERITY_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;

    // Init database
    let db = verity_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    let public_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/{post_id}", get(posts::get_post))
        .route("/api/posts/{post_id}/comments", get(comments::get_comments))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/posts", post(posts::create_post))
        .route("/api/posts/{post_id}", delete(posts::delete_post))
        .route("/api/posts/{post_id}/react", post(reactions::react_post))
        .route("/api/posts/{post_id}/comments", post(comments::add_comment))
        .route("/api/users/suggested", get(follows::suggested_users))
        .route("/api/users/{email}/posts", get(posts::user_posts))
        .route("/api/users/{email}/followers", get(follows::get_followers))
        .route("/api/users/{email}/following", get(follows::get_following))
        .route("/api/follow", post(follows::follow_toggle))
        .layer(middleware::from_fn(require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Verity server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
