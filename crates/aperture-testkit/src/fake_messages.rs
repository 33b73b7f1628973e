//! In-memory stand-in for the users/messages tables, used by message
//! tests that never touch SQLite.

use std::collections::BTreeMap;

use thiserror::Error;

/// Raised when a store operation references a user id that was never
/// created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FakeStoreError {
    #[error("user {0} does not exist")]
    UnknownUser(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeMessage {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
}

/// Counters and maps live on the instance; a fresh store per test means
/// ids always start at 1. Sequential keys in a BTreeMap keep iteration
/// in insertion order.
#[derive(Debug)]
pub struct FakeMessageStore {
    users: BTreeMap<i64, FakeUser>,
    messages: BTreeMap<i64, FakeMessage>,
    next_user_id: i64,
    next_message_id: i64,
}

impl FakeMessageStore {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            messages: BTreeMap::new(),
            next_user_id: 1,
            next_message_id: 1,
        }
    }

    pub fn create_user(&mut self, email: &str, username: &str, password: &str) -> FakeUser {
        let id = self.next_user_id;
        self.next_user_id += 1;

        let user = FakeUser {
            id,
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.users.insert(id, user.clone());
        user
    }

    /// Both participants must already exist.
    pub fn create_message(
        &mut self,
        sender_id: i64,
        receiver_id: i64,
        content: &str,
    ) -> Result<FakeMessage, FakeStoreError> {
        for id in [sender_id, receiver_id] {
            if !self.users.contains_key(&id) {
                return Err(FakeStoreError::UnknownUser(id));
            }
        }

        let id = self.next_message_id;
        self.next_message_id += 1;

        let message = FakeMessage {
            id,
            sender_id,
            receiver_id,
            content: content.to_string(),
        };
        self.messages.insert(id, message.clone());
        Ok(message)
    }

    /// Every message where the user is sender or receiver, in insertion
    /// order.
    pub fn get_messages_for_user(&self, user_id: i64) -> Result<Vec<&FakeMessage>, FakeStoreError> {
        if !self.users.contains_key(&user_id) {
            return Err(FakeStoreError::UnknownUser(user_id));
        }

        Ok(self
            .messages
            .values()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
            .collect())
    }

    pub fn user(&self, id: i64) -> Option<&FakeUser> {
        self.users.get(&id)
    }
}

impl Default for FakeMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_get_sequential_ids_from_one() {
        let mut store = FakeMessageStore::new();
        let a = store.create_user("a@x.com", "a", "pw");
        let b = store.create_user("b@x.com", "b", "pw");

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.user(1), Some(&a));
    }

    #[test]
    fn message_roundtrip_between_two_users() {
        let mut store = FakeMessageStore::new();
        let a = store.create_user("a@x.com", "a", "pw");
        let b = store.create_user("b@x.com", "b", "pw");

        let message = store.create_message(a.id, b.id, "hi").unwrap();
        assert_eq!(message.id, 1);

        // unknown receiver
        assert_eq!(
            store.create_message(a.id, 999, "hi"),
            Err(FakeStoreError::UnknownUser(999))
        );

        let for_a = store.get_messages_for_user(a.id).unwrap();
        assert_eq!(for_a, vec![&message]);
    }

    #[test]
    fn unknown_sender_is_rejected() {
        let mut store = FakeMessageStore::new();
        let b = store.create_user("b@x.com", "b", "pw");

        assert_eq!(
            store.create_message(42, b.id, "hi"),
            Err(FakeStoreError::UnknownUser(42))
        );
    }

    #[test]
    fn messages_come_back_in_insertion_order() {
        let mut store = FakeMessageStore::new();
        let a = store.create_user("a@x.com", "a", "pw");
        let b = store.create_user("b@x.com", "b", "pw");
        let c = store.create_user("c@x.com", "c", "pw");

        store.create_message(a.id, b.id, "first").unwrap();
        store.create_message(c.id, a.id, "second").unwrap();
        store.create_message(b.id, c.id, "not for a").unwrap();
        store.create_message(a.id, c.id, "third").unwrap();

        let contents: Vec<&str> = store
            .get_messages_for_user(a.id)
            .unwrap()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn lookups_for_unknown_users_fail() {
        let store = FakeMessageStore::new();
        assert_eq!(
            store.get_messages_for_user(1),
            Err(FakeStoreError::UnknownUser(1))
        );
    }

    #[test]
    fn each_store_owns_its_counters() {
        let mut first = FakeMessageStore::new();
        first.create_user("a@x.com", "a", "pw");
        first.create_user("b@x.com", "b", "pw");

        let mut second = FakeMessageStore::new();
        assert_eq!(second.create_user("c@x.com", "c", "pw").id, 1);
    }
}
