use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            username    TEXT NOT NULL,
            avatar_url  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created
            ON posts(created_at);

        CREATE TABLE IF NOT EXISTS stats (
            key         TEXT PRIMARY KEY,
            value       INTEGER NOT NULL
        );

        -- Seed the view counter exactly once
        INSERT OR IGNORE INTO stats (key, value) VALUES ('views', 0);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
