use rusqlite::{OptionalExtension, Row, params};

use crate::models::{PostRow, UserRow};
use crate::{Database, StoreError};

const FEED_SELECT: &str = "SELECT posts.id, posts.user_id, posts.content, posts.created_at,
            users.username, users.avatar_url
     FROM posts
     JOIN users ON posts.user_id = users.id";

impl Database {
    // -- Users --

    /// Duplicate emails are caught by the UNIQUE constraint, not a pre-check:
    /// under concurrent signups exactly one insert wins and the loser gets
    /// `Conflict`.
    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        username: &str,
        avatar_url: &str,
    ) -> Result<UserRow, StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (email, password, username, avatar_url) VALUES (?1, ?2, ?3, ?4)",
                params![email, password_hash, username, avatar_url],
            )
            .map_err(map_constraint)?;

            Ok(UserRow {
                id: conn.last_insert_rowid(),
                email: email.to_string(),
                password: password_hash.to_string(),
                username: username.to_string(),
                avatar_url: avatar_url.to_string(),
            })
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password, username, avatar_url FROM users WHERE email = ?1",
            )?;

            let row = stmt
                .query_row([email], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password: row.get(2)?,
                        username: row.get(3)?,
                        avatar_url: row.get(4)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    // -- Posts --

    /// Insert a post, then re-read the joined row so the caller gets the
    /// denormalized author fields in a single call.
    pub fn create_post(&self, author_id: i64, content: &str) -> Result<PostRow, StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (user_id, content) VALUES (?1, ?2)",
                params![author_id, content],
            )
            .map_err(map_constraint)?;

            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare(&format!("{FEED_SELECT} WHERE posts.id = ?1"))?;
            let row = stmt.query_row([id], post_row)?;
            Ok(row)
        })
    }

    /// Full feed, newest first. The id tiebreak keeps same-second inserts in
    /// insertion order (SQLite timestamps have one-second resolution).
    pub fn list_posts(&self) -> Result<Vec<PostRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{FEED_SELECT} ORDER BY posts.created_at DESC, posts.id DESC"
            ))?;

            let rows = stmt
                .query_map([], post_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- View counter --

    /// Increment the counter and return the new value. Both statements run
    /// under one lock acquisition, so concurrent callers each observe a
    /// distinct post-increment value.
    pub fn record_view(&self) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            conn.execute("UPDATE stats SET value = value + 1 WHERE key = 'views'", [])?;

            let value = conn.query_row("SELECT value FROM stats WHERE key = 'views'", [], |row| {
                row.get(0)
            })?;

            Ok(value)
        })
    }
}

fn post_row(row: &Row) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        username: row.get(4)?,
        avatar_url: row.get(5)?,
    })
}

fn map_constraint(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::Conflict
        }
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            StoreError::ForeignKey
        }
        _ => StoreError::Sqlite(err),
    }
}
