/// Fixed-value identity records used to seed tests deterministically.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub admin: bool,
}

impl TestUser {
    /// Field map of the record, mirroring what the persistence helpers
    /// write to storage.
    pub fn fields(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "password": self.password,
            "admin": self.admin,
        })
    }
}

/// The regular persona.
pub fn user() -> TestUser {
    TestUser {
        id: 1,
        username: "example".to_string(),
        email: "example@example.com".to_string(),
        password: "secret".to_string(),
        admin: false,
    }
}

/// The administrator persona.
pub fn admin() -> TestUser {
    TestUser {
        id: 99,
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        password: "admin".to_string(),
        admin: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_fields_match_literals() {
        let fields = user().fields();
        assert_eq!(
            fields,
            serde_json::json!({
                "id": 1,
                "username": "example",
                "email": "example@example.com",
                "password": "secret",
                "admin": false,
            })
        );
    }

    #[test]
    fn admin_fields_match_literals() {
        let fields = admin().fields();
        assert_eq!(
            fields,
            serde_json::json!({
                "id": 99,
                "username": "admin",
                "email": "admin@example.com",
                "password": "admin",
                "admin": true,
            })
        );
    }
}
