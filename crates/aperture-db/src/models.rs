/// Database row types — these map directly to SQLite rows.
/// Distinct from the aperture-types API models to keep the DB layer
/// independent.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub admin: bool,
    pub confirmed: bool,
    pub refresh_token: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct PictureRow {
    pub id: i64,
    pub user_id: i64,
    pub rating: f64,
    pub picture_name: String,
    pub description: String,
    /// JSON-encoded list of tag strings.
    pub tags: String,
    pub created_at: String,
}

/// Insert payload for users. `id: None` lets SQLite assign the next
/// rowid; test fixtures pass explicit ids.
pub struct NewUser<'a> {
    pub id: Option<i64>,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub admin: bool,
}

pub struct NewPicture<'a> {
    pub user_id: i64,
    pub rating: f64,
    pub picture_name: &'a str,
    pub description: &'a str,
    /// JSON-encoded list of tag strings.
    pub tags: &'a str,
}
