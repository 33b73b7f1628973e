//! In-memory stand-in for the pictures/users tables, used by search
//! tests. Pictures are kept as one canonical struct; callers needing a
//! map form derive it with [`FakePicture::fields`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::identities::TestUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeSearchUser {
    pub id: i64,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakePicture {
    pub id: i64,
    pub user_id: i64,
    pub rating: f64,
    /// Snapshot of the owning user's fields at creation time.
    pub user: serde_json::Value,
    pub tags: Vec<String>,
    pub picture_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl FakePicture {
    pub fn fields(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "user_id": self.user_id,
            "rating": self.rating,
            "user": self.user,
            "tags": self.tags,
            "picture_name": self.picture_name,
            "description": self.description,
            "created_at": self.created_at.to_rfc3339(),
        })
    }
}

#[derive(Debug)]
pub struct FakeSearchStore {
    pictures: BTreeMap<i64, FakePicture>,
    users: BTreeMap<i64, FakeSearchUser>,
    next_picture_id: i64,
    next_user_id: i64,
}

impl FakeSearchStore {
    pub fn new() -> Self {
        Self {
            pictures: BTreeMap::new(),
            users: BTreeMap::new(),
            next_picture_id: 1,
            next_user_id: 1,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_picture(
        &mut self,
        user_id: i64,
        rating: f64,
        user: &TestUser,
        tags: &[String],
        picture_name: &str,
        description: &str,
        created_at: DateTime<Utc>,
    ) -> FakePicture {
        let id = self.next_picture_id;
        self.next_picture_id += 1;

        let picture = FakePicture {
            id,
            user_id,
            rating,
            user: user.fields(),
            tags: tags.to_vec(),
            picture_name: picture_name.to_string(),
            description: description.to_string(),
            created_at,
        };
        self.pictures.insert(id, picture.clone());
        picture
    }

    /// Bulk helper: n pictures with loop-index-derived field values.
    pub fn create_x_pictures(&mut self, n: usize) -> Vec<FakePicture> {
        let mut pictures = Vec::with_capacity(n);
        for i in 0..n {
            let owner = TestUser {
                id: i as i64,
                username: format!("test_user{i}"),
                email: format!("test_email{i}@example.com"),
                password: format!("test_password{i}"),
                admin: false,
            };
            let picture = self.create_picture(
                i as i64,
                i as f64,
                &owner,
                &[format!("test_tags{i}")],
                &format!("test_picture_name{i}"),
                &format!("test_description{i}"),
                Utc::now(),
            );
            pictures.push(picture);
        }
        pictures
    }

    pub fn create_user(&mut self, email: &str, username: &str) -> FakeSearchUser {
        let id = self.next_user_id;
        self.next_user_id += 1;

        let user = FakeSearchUser {
            id,
            email: email.to_string(),
            username: username.to_string(),
        };
        self.users.insert(id, user.clone());
        user
    }

    /// Bulk helper: n users with loop-index-derived field values, all of
    /// them returned.
    pub fn create_x_users(&mut self, n: usize) -> Vec<FakeSearchUser> {
        let mut users = Vec::with_capacity(n);
        for i in 0..n {
            users.push(self.create_user(&format!("test_email{i}"), &format!("test_username{i}")));
        }
        users
    }

    pub fn picture(&self, id: i64) -> Option<&FakePicture> {
        self.pictures.get(&id)
    }

    pub fn user(&self, id: i64) -> Option<&FakeSearchUser> {
        self.users.get(&id)
    }
}

impl Default for FakeSearchStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identities;

    #[test]
    fn create_picture_stores_the_canonical_record() {
        let mut store = FakeSearchStore::new();
        let owner = identities::user();

        let picture = store.create_picture(
            owner.id,
            4.5,
            &owner,
            &["sunset".to_string(), "beach".to_string()],
            "evening",
            "a sunset",
            Utc::now(),
        );

        assert_eq!(picture.id, 1);
        assert_eq!(store.picture(1), Some(&picture));
        assert_eq!(picture.user["email"], "example@example.com");

        let fields = picture.fields();
        assert_eq!(fields["picture_name"], "evening");
        assert_eq!(fields["tags"], serde_json::json!(["sunset", "beach"]));
    }

    #[test]
    fn create_x_pictures_yields_strictly_increasing_ids() {
        let mut store = FakeSearchStore::new();
        let pictures = store.create_x_pictures(5);

        assert_eq!(pictures.len(), 5);
        let ids: Vec<i64> = pictures.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(pictures[3].picture_name, "test_picture_name3");
    }

    #[test]
    fn create_x_users_returns_every_user() {
        let mut store = FakeSearchStore::new();
        let users = store.create_x_users(3);

        assert_eq!(users.len(), 3);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[2].username, "test_username2");
        assert_eq!(store.user(2), Some(&users[1]));
    }

    #[test]
    fn picture_and_user_counters_are_independent() {
        let mut store = FakeSearchStore::new();
        store.create_user("a@x.com", "a");
        store.create_x_pictures(2);

        assert_eq!(store.create_user("b@x.com", "b").id, 2);
        let next = store.create_picture(
            1,
            0.0,
            &identities::user(),
            &[],
            "third",
            "",
            Utc::now(),
        );
        assert_eq!(next.id, 3);
    }
}
