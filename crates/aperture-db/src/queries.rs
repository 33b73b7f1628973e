use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::models::{MessageRow, NewPicture, NewUser, PictureRow, UserRow};

impl Database {
    // -- Users --

    /// Insert a user and return its id. Constraint violations (duplicate
    /// email, reused id) come back as the raw storage error.
    pub fn insert_user(&self, user: &NewUser) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, admin)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![user.id, user.username, user.email, user.password, user.admin],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn set_password(&self, email: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET password = ?1 WHERE email = ?2",
                (password_hash, email),
            )?;
            Ok(())
        })
    }

    pub fn confirm_email(&self, email: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("UPDATE users SET confirmed = 1 WHERE email = ?1", [email])?;
            Ok(())
        })
    }

    /// Store or clear the refresh token on a user row.
    pub fn set_refresh_token(&self, email: &str, token: Option<&str>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET refresh_token = ?1 WHERE email = ?2",
                (token, email),
            )?;
            Ok(())
        })
    }

    // -- Messages --

    pub fn insert_message(&self, sender_id: i64, receiver_id: i64, content: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, receiver_id, content) VALUES (?1, ?2, ?3)",
                rusqlite::params![sender_id, receiver_id, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn message_by_id(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, receiver_id, content, created_at
                 FROM messages WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], message_from_row).optional()?;
            Ok(row)
        })
    }

    /// Every message sent or received by the user, oldest first.
    pub fn messages_for_user(&self, user_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, receiver_id, content, created_at
                 FROM messages
                 WHERE sender_id = ?1 OR receiver_id = ?1
                 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Pictures --

    pub fn insert_picture(&self, picture: &NewPicture) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pictures (user_id, rating, picture_name, description, tags)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    picture.user_id,
                    picture.rating,
                    picture.picture_name,
                    picture.description,
                    picture.tags
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn pictures_for_user(&self, user_id: i64) -> Result<Vec<PictureRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, rating, picture_name, description, tags, created_at
                 FROM pictures WHERE user_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(PictureRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        rating: row.get(2)?,
                        picture_name: row.get(3)?,
                        description: row.get(4)?,
                        tags: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, admin, confirmed, refresh_token, created_at
         FROM users WHERE email = ?1",
    )?;

    let row = stmt.query_row([email], user_from_row).optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, admin, confirmed, refresh_token, created_at
         FROM users WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], user_from_row).optional()?;

    Ok(row)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        admin: row.get(4)?,
        confirmed: row.get(5)?,
        refresh_token: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn message_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<MessageRow, rusqlite::Error> {
    Ok(MessageRow {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        (db, dir)
    }

    #[test]
    fn user_roundtrip() {
        let (db, _dir) = open_test_db();

        let id = db
            .insert_user(&NewUser {
                id: Some(7),
                username: "nadia",
                email: "nadia@example.com",
                password: "pw",
                admin: false,
            })
            .unwrap();
        assert_eq!(id, 7);

        let row = db.user_by_email("nadia@example.com").unwrap().unwrap();
        assert_eq!(row.id, 7);
        assert!(!row.admin);
        assert!(!row.confirmed);
        assert_eq!(row.refresh_token, None);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (db, _dir) = open_test_db();

        let user = NewUser {
            id: None,
            username: "nadia",
            email: "nadia@example.com",
            password: "pw",
            admin: false,
        };
        db.insert_user(&user).unwrap();
        assert!(db.insert_user(&user).is_err());
    }

    #[test]
    fn message_requires_existing_participants() {
        let (db, _dir) = open_test_db();

        let sender = db
            .insert_user(&NewUser {
                id: None,
                username: "a",
                email: "a@x.com",
                password: "pw",
                admin: false,
            })
            .unwrap();

        // receiver id 999 violates the foreign key
        assert!(db.insert_message(sender, 999, "hi").is_err());
    }

    #[test]
    fn messages_for_user_covers_both_directions() {
        let (db, _dir) = open_test_db();

        let a = db
            .insert_user(&NewUser {
                id: None,
                username: "a",
                email: "a@x.com",
                password: "pw",
                admin: false,
            })
            .unwrap();
        let b = db
            .insert_user(&NewUser {
                id: None,
                username: "b",
                email: "b@x.com",
                password: "pw",
                admin: false,
            })
            .unwrap();

        db.insert_message(a, b, "first").unwrap();
        db.insert_message(b, a, "second").unwrap();

        let messages = db.messages_for_user(a).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }

    #[test]
    fn reset_schema_wipes_rows() {
        let (db, _dir) = open_test_db();

        db.insert_user(&NewUser {
            id: None,
            username: "a",
            email: "a@x.com",
            password: "pw",
            admin: false,
        })
        .unwrap();

        db.reset_schema().unwrap();
        assert!(db.user_by_email("a@x.com").unwrap().is_none());
    }
}
