//! Database row types that map directly to SQLite rows.
//! Distinct from the verse-types API models to keep the DB layer independent.

#[derive(Debug)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub username: String,
    pub avatar_url: String,
}

/// A post joined with its author's display fields.
#[derive(Debug)]
pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: String,
    pub username: String,
    pub avatar_url: String,
}
