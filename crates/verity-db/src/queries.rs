use crate::Database;
use crate::models::{CommentRow, PostRow, ReactionRow, UserRow, UserSummaryRow};
use anyhow::Result;
use rusqlite::Connection;
use verity_types::models::ReactionKind;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
        created_at: i64,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, username, email, password_hash, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    /// Users the given user might want to follow: everyone except themselves
    /// and accounts they already follow, newest accounts first.
    pub fn suggested_users(&self, user_id: &str, limit: u32) -> Result<Vec<UserSummaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, email FROM users
                 WHERE id != ?1
                   AND id NOT IN (SELECT followee_id FROM follows WHERE follower_id = ?1)
                 ORDER BY created_at DESC
                 LIMIT ?2",
            )?;

            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], |row| {
                    Ok(UserSummaryRow {
                        username: row.get(0)?,
                        email: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Posts --

    #[allow(clippy::too_many_arguments)]
    pub fn insert_post(
        &self,
        id: &str,
        author_id: &str,
        title: &str,
        content: &str,
        media: Option<&[u8]>,
        media_type: Option<&str>,
        created_at: i64,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (id, author_id, title, content, media, media_type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![id, author_id, title, content, media, media_type, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{POST_SELECT} WHERE p.id = ?1"))?;
            let row = stmt.query_row([id], map_post_row).optional()?;
            Ok(row)
        })
    }

    pub fn get_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("{POST_SELECT} ORDER BY p.created_at DESC"))?;
            let rows = stmt
                .query_map([], map_post_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_posts_by_author_email(&self, email: &str) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{POST_SELECT} WHERE u.email = ?1 ORDER BY p.created_at DESC"
            ))?;
            let rows = stmt
                .query_map([email], map_post_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns false if no post with that id existed.
    /// Reactions and comments go with it (ON DELETE CASCADE).
    pub fn delete_post(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Reactions --

    /// Toggle a like/dislike for one user on one post:
    /// same kind again removes it, the opposite kind replaces it, otherwise
    /// it is inserted. Runs in a single transaction so concurrent toggles on
    /// the same post cannot lose updates.
    ///
    /// Returns `None` if the post does not exist, otherwise the recomputed
    /// (likes, dislikes) email sets.
    pub fn toggle_reaction(
        &self,
        post_id: &str,
        user_id: &str,
        kind: ReactionKind,
        created_at: i64,
    ) -> Result<Option<(Vec<String>, Vec<String>)>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let post_exists: Option<i64> = tx
                .query_row("SELECT 1 FROM posts WHERE id = ?1", [post_id], |row| {
                    row.get(0)
                })
                .optional()?;
            if post_exists.is_none() {
                return Ok(None);
            }

            let existing: Option<String> = tx
                .query_row(
                    "SELECT kind FROM reactions WHERE post_id = ?1 AND user_id = ?2",
                    rusqlite::params![post_id, user_id],
                    |row| row.get(0),
                )
                .optional()?;

            match existing.as_deref() {
                Some(current) if current == kind.as_str() => {
                    // Toggle off
                    tx.execute(
                        "DELETE FROM reactions WHERE post_id = ?1 AND user_id = ?2",
                        rusqlite::params![post_id, user_id],
                    )?;
                }
                Some(_) => {
                    // Move between the two sets
                    tx.execute(
                        "UPDATE reactions SET kind = ?3, created_at = ?4
                         WHERE post_id = ?1 AND user_id = ?2",
                        rusqlite::params![post_id, user_id, kind.as_str(), created_at],
                    )?;
                }
                None => {
                    tx.execute(
                        "INSERT INTO reactions (post_id, user_id, kind, created_at)
                         VALUES (?1, ?2, ?3, ?4)",
                        rusqlite::params![post_id, user_id, kind.as_str(), created_at],
                    )?;
                }
            }

            let sets = query_reaction_sets(&tx, post_id)?;
            tx.commit()?;

            Ok(Some(sets))
        })
    }

    /// Batch-fetch reactions for a set of post IDs.
    pub fn get_reactions_for_posts(&self, post_ids: &[String]) -> Result<Vec<ReactionRow>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=post_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT r.post_id, u.email, r.kind
                 FROM reactions r
                 JOIN users u ON r.user_id = u.id
                 WHERE r.post_id IN ({})",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = post_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(ReactionRow {
                        post_id: row.get(0)?,
                        user_email: row.get(1)?,
                        kind: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Comments --

    /// Append a comment. Unlike the reaction toggle there is nothing to
    /// recompute: the insert itself is the append. Returns false if the post
    /// does not exist (and creates nothing).
    pub fn insert_comment(
        &self,
        id: &str,
        post_id: &str,
        author_id: &str,
        body: &str,
        created_at: i64,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let post_exists: Option<i64> = tx
                .query_row("SELECT 1 FROM posts WHERE id = ?1", [post_id], |row| {
                    row.get(0)
                })
                .optional()?;
            if post_exists.is_none() {
                return Ok(false);
            }

            tx.execute(
                "INSERT INTO comments (id, post_id, author_id, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, post_id, author_id, body, created_at],
            )?;
            tx.commit()?;

            Ok(true)
        })
    }

    /// Comments for one post, oldest first. `None` if the post is missing.
    pub fn get_comments(&self, post_id: &str) -> Result<Option<Vec<CommentRow>>> {
        self.with_conn(|conn| {
            let post_exists: Option<i64> = conn
                .query_row("SELECT 1 FROM posts WHERE id = ?1", [post_id], |row| {
                    row.get(0)
                })
                .optional()?;
            if post_exists.is_none() {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                "SELECT c.post_id, u.username, u.email, c.body, c.created_at
                 FROM comments c
                 JOIN users u ON c.author_id = u.id
                 WHERE c.post_id = ?1
                 ORDER BY c.created_at ASC, c.rowid ASC",
            )?;
            let rows = stmt
                .query_map([post_id], map_comment_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Some(rows))
        })
    }

    /// Batch-fetch comments for a set of post IDs.
    pub fn get_comments_for_posts(&self, post_ids: &[String]) -> Result<Vec<CommentRow>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=post_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT c.post_id, u.username, u.email, c.body, c.created_at
                 FROM comments c
                 JOIN users u ON c.author_id = u.id
                 WHERE c.post_id IN ({})
                 ORDER BY c.created_at ASC, c.rowid ASC",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = post_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), map_comment_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Follow graph --

    /// Idempotent: following someone already followed is a no-op.
    pub fn follow(&self, follower_id: &str, followee_id: &str, created_at: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO follows (follower_id, followee_id, created_at)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![follower_id, followee_id, created_at],
            )?;
            Ok(())
        })
    }

    /// Idempotent: unfollowing someone never followed is a no-op.
    pub fn unfollow(&self, follower_id: &str, followee_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
                rusqlite::params![follower_id, followee_id],
            )?;
            Ok(())
        })
    }

    pub fn get_followers(&self, user_id: &str) -> Result<Vec<UserSummaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.username, u.email
                 FROM follows f
                 JOIN users u ON f.follower_id = u.id
                 WHERE f.followee_id = ?1
                 ORDER BY f.created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_user_summary)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_following(&self, user_id: &str) -> Result<Vec<UserSummaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.username, u.email
                 FROM follows f
                 JOIN users u ON f.followee_id = u.id
                 WHERE f.follower_id = ?1
                 ORDER BY f.created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_user_summary)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

const POST_SELECT: &str = "SELECT p.id, u.username, u.email, p.title, p.content, p.media, p.media_type, p.created_at
     FROM posts p
     JOIN users u ON p.author_id = u.id";

fn map_post_row(row: &rusqlite::Row<'_>) -> std::result::Result<PostRow, rusqlite::Error> {
    Ok(PostRow {
        id: row.get(0)?,
        author_username: row.get(1)?,
        author_email: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        media: row.get(5)?,
        media_type: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_comment_row(row: &rusqlite::Row<'_>) -> std::result::Result<CommentRow, rusqlite::Error> {
    Ok(CommentRow {
        post_id: row.get(0)?,
        author_username: row.get(1)?,
        author_email: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn map_user_summary(
    row: &rusqlite::Row<'_>,
) -> std::result::Result<UserSummaryRow, rusqlite::Error> {
    Ok(UserSummaryRow {
        username: row.get(0)?,
        email: row.get(1)?,
    })
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is always a literal from this module, never user input.
    let mut stmt = conn.prepare(&format!(
        "SELECT id, username, email, password, created_at FROM users WHERE {column} = ?1"
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_reaction_sets(conn: &Connection, post_id: &str) -> Result<(Vec<String>, Vec<String>)> {
    let mut stmt = conn.prepare(
        "SELECT u.email, r.kind
         FROM reactions r
         JOIN users u ON r.user_id = u.id
         WHERE r.post_id = ?1",
    )?;

    let mut likes = Vec::new();
    let mut dislikes = Vec::new();
    let rows = stmt.query_map([post_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (email, kind) = row?;
        if kind == "like" {
            likes.push(email);
        } else {
            dislikes.push(email);
        }
    }

    Ok((likes, dislikes))
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use verity_types::models::ReactionKind::{Dislike, Like};

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_user(db: &Database, username: &str, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, username, email, "argon2-hash", 1_000).unwrap();
        id
    }

    fn add_post(db: &Database, author_id: &str, title: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_post(&id, author_id, title, "content", None, None, 2_000)
            .unwrap();
        id
    }

    fn assert_set_eq(actual: &[String], expected: &[&str]) {
        let mut actual: Vec<&str> = actual.iter().map(String::as_str).collect();
        let mut expected = expected.to_vec();
        actual.sort_unstable();
        expected.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[test]
    fn reaction_like_then_dislike_then_dislike_again() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        let p1 = add_post(&db, &alice, "p1");

        let (likes, dislikes) = db.toggle_reaction(&p1, &bob, Like, 10).unwrap().unwrap();
        assert_set_eq(&likes, &["bob@example.com"]);
        assert_set_eq(&dislikes, &[]);

        let (likes, dislikes) = db.toggle_reaction(&p1, &bob, Dislike, 11).unwrap().unwrap();
        assert_set_eq(&likes, &[]);
        assert_set_eq(&dislikes, &["bob@example.com"]);

        let (likes, dislikes) = db.toggle_reaction(&p1, &bob, Dislike, 12).unwrap().unwrap();
        assert_set_eq(&likes, &[]);
        assert_set_eq(&dislikes, &[]);
    }

    #[test]
    fn reaction_double_like_toggles_off() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        let post = add_post(&db, &alice, "post");

        let (likes, _) = db.toggle_reaction(&post, &bob, Like, 10).unwrap().unwrap();
        assert_set_eq(&likes, &["bob@example.com"]);

        let (likes, dislikes) = db.toggle_reaction(&post, &bob, Like, 11).unwrap().unwrap();
        assert_set_eq(&likes, &[]);
        assert_set_eq(&dislikes, &[]);
    }

    #[test]
    fn reaction_user_in_at_most_one_set_after_any_sequence() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        let post = add_post(&db, &alice, "post");

        let sequence = [Like, Like, Dislike, Dislike, Like, Dislike, Like, Like];
        for (i, kind) in sequence.iter().enumerate() {
            let (likes, dislikes) = db
                .toggle_reaction(&post, &bob, *kind, i as i64)
                .unwrap()
                .unwrap();
            let in_likes = likes.iter().any(|e| e == "bob@example.com");
            let in_dislikes = dislikes.iter().any(|e| e == "bob@example.com");
            assert!(
                !(in_likes && in_dislikes),
                "after step {} bob is in both sets",
                i
            );
        }
    }

    #[test]
    fn reaction_sets_are_independent_per_user() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        let carol = add_user(&db, "carol", "carol@example.com");
        let post = add_post(&db, &alice, "post");

        db.toggle_reaction(&post, &bob, Like, 10).unwrap().unwrap();
        let (likes, dislikes) = db.toggle_reaction(&post, &carol, Dislike, 11).unwrap().unwrap();
        assert_set_eq(&likes, &["bob@example.com"]);
        assert_set_eq(&dislikes, &["carol@example.com"]);
    }

    #[test]
    fn reaction_on_missing_post_returns_none() {
        let db = test_db();
        let bob = add_user(&db, "bob", "bob@example.com");

        let result = db.toggle_reaction("no-such-post", &bob, Like, 10).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn follow_is_idempotent() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");

        db.follow(&alice, &bob, 10).unwrap();
        db.follow(&alice, &bob, 11).unwrap();

        let followers = db.get_followers(&bob).unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].email, "alice@example.com");

        let following = db.get_following(&alice).unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].email, "bob@example.com");
    }

    #[test]
    fn unfollow_without_follow_is_a_noop() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");

        db.unfollow(&alice, &bob).unwrap();
        assert!(db.get_followers(&bob).unwrap().is_empty());
        assert!(db.get_following(&alice).unwrap().is_empty());
    }

    #[test]
    fn follower_and_following_views_stay_consistent() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");

        db.follow(&alice, &bob, 10).unwrap();
        assert_eq!(db.get_following(&alice).unwrap().len(), 1);
        assert_eq!(db.get_followers(&bob).unwrap().len(), 1);

        db.unfollow(&alice, &bob).unwrap();
        assert!(db.get_following(&alice).unwrap().is_empty());
        assert!(db.get_followers(&bob).unwrap().is_empty());
    }

    #[test]
    fn suggested_users_excludes_self_and_followed() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        add_user(&db, "carol", "carol@example.com");

        db.follow(&alice, &bob, 10).unwrap();

        let suggested = db.suggested_users(&alice, 5).unwrap();
        assert_eq!(suggested.len(), 1);
        assert_eq!(suggested[0].email, "carol@example.com");
    }

    #[test]
    fn delete_post_removes_reactions_and_comments() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        let post = add_post(&db, &alice, "post");

        db.toggle_reaction(&post, &bob, Like, 10).unwrap().unwrap();
        assert!(db.insert_comment("c1", &post, &bob, "nice", 11).unwrap());

        assert!(db.delete_post(&post).unwrap());
        assert!(db.get_post(&post).unwrap().is_none());
        assert!(db.get_comments(&post).unwrap().is_none());
        assert!(db.get_reactions_for_posts(&[post]).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_post_reports_false() {
        let db = test_db();
        assert!(!db.delete_post("no-such-post").unwrap());
    }

    #[test]
    fn comment_on_missing_post_creates_nothing() {
        let db = test_db();
        let bob = add_user(&db, "bob", "bob@example.com");

        assert!(!db.insert_comment("c1", "no-such-post", &bob, "hi", 10).unwrap());
        assert!(db.get_post("no-such-post").unwrap().is_none());
        assert!(db
            .get_comments_for_posts(&["no-such-post".into()])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn comments_come_back_oldest_first() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        let post = add_post(&db, &alice, "post");

        db.insert_comment("c1", &post, &bob, "first", 10).unwrap();
        db.insert_comment("c2", &post, &alice, "second", 20).unwrap();
        db.insert_comment("c3", &post, &bob, "third", 30).unwrap();

        let comments = db.get_comments(&post).unwrap().unwrap();
        let bodies: Vec<&str> = comments.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, ["first", "second", "third"]);
    }

    #[test]
    fn posts_come_back_newest_first() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let old = Uuid::new_v4().to_string();
        let new = Uuid::new_v4().to_string();
        db.insert_post(&old, &alice, "old", "content", None, None, 100)
            .unwrap();
        db.insert_post(&new, &alice, "new", "content", None, None, 200)
            .unwrap();

        let posts = db.get_posts().unwrap();
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["new", "old"]);
    }

    #[test]
    fn post_media_round_trips_as_bytes() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let id = Uuid::new_v4().to_string();
        let payload = vec![0u8, 159, 146, 150];
        db.insert_post(&id, &alice, "pic", "content", Some(&payload), Some("image"), 100)
            .unwrap();

        let post = db.get_post(&id).unwrap().unwrap();
        assert_eq!(post.media.as_deref(), Some(payload.as_slice()));
        assert_eq!(post.media_type.as_deref(), Some("image"));
    }

    #[test]
    fn duplicate_email_is_rejected_by_the_store() {
        let db = test_db();
        add_user(&db, "alice", "alice@example.com");
        let err = db.create_user("id2", "alice2", "alice@example.com", "hash", 1_000);
        assert!(err.is_err());
    }

    #[test]
    fn user_lookups_by_email_username_and_id() {
        let db = test_db();
        let id = add_user(&db, "alice", "alice@example.com");

        assert_eq!(db.get_user_by_email("alice@example.com").unwrap().unwrap().id, id);
        assert_eq!(db.get_user_by_username("alice").unwrap().unwrap().id, id);
        assert_eq!(db.get_user_by_id(&id).unwrap().unwrap().username, "alice");
        assert!(db.get_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn posts_by_author_email_filters_correctly() {
        let db = test_db();
        let alice = add_user(&db, "alice", "alice@example.com");
        let bob = add_user(&db, "bob", "bob@example.com");
        add_post(&db, &alice, "from-alice");
        add_post(&db, &bob, "from-bob");

        let posts = db.get_posts_by_author_email("alice@example.com").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "from-alice");
        assert_eq!(posts[0].author_username, "alice");
    }
}
