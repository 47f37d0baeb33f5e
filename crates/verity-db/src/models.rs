/// Database row types — these map directly to SQLite rows.
/// Distinct from verity-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: i64,
}

/// Post joined with its author row; media stays raw bytes here,
/// base64 encoding happens at the API boundary.
pub struct PostRow {
    pub id: String,
    pub author_username: String,
    pub author_email: String,
    pub title: String,
    pub content: String,
    pub media: Option<Vec<u8>>,
    pub media_type: Option<String>,
    pub created_at: i64,
}

pub struct CommentRow {
    pub post_id: String,
    pub author_username: String,
    pub author_email: String,
    pub body: String,
    pub created_at: i64,
}

pub struct ReactionRow {
    pub post_id: String,
    pub user_email: String,
    pub kind: String,
}

pub struct UserSummaryRow {
    pub username: String,
    pub email: String,
}
