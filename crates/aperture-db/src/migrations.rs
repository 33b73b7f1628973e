use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY,
            username        TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            admin           INTEGER NOT NULL DEFAULT 0,
            confirmed       INTEGER NOT NULL DEFAULT 0,
            refresh_token   TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY,
            sender_id   INTEGER NOT NULL REFERENCES users(id),
            receiver_id INTEGER NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_sender
            ON messages(sender_id);

        CREATE INDEX IF NOT EXISTS idx_messages_receiver
            ON messages(receiver_id);

        CREATE TABLE IF NOT EXISTS pictures (
            id           INTEGER PRIMARY KEY,
            user_id      INTEGER NOT NULL REFERENCES users(id),
            rating       REAL NOT NULL DEFAULT 0,
            picture_name TEXT NOT NULL,
            description  TEXT NOT NULL DEFAULT '',
            tags         TEXT NOT NULL DEFAULT '[]',
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_pictures_user
            ON pictures(user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

/// Tear the whole schema down. Children drop before parents while
/// foreign_keys is ON.
pub fn drop_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        DROP TABLE IF EXISTS pictures;
        DROP TABLE IF EXISTS messages;
        DROP TABLE IF EXISTS users;
        ",
    )?;
    Ok(())
}
