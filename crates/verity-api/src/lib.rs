pub mod auth;
pub mod comments;
pub mod error;
pub mod follows;
pub mod middleware;
pub mod posts;
pub mod reactions;
