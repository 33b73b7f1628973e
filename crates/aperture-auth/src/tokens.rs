use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AuthError, password};

pub const SCOPE_ACCESS: &str = "access_token";
pub const SCOPE_REFRESH: &str = "refresh_token";

const ACCESS_TTL_MINUTES: i64 = 15;
const REFRESH_TTL_DAYS: i64 = 7;

/// JWT claims for both token kinds. `sub` carries the user's email;
/// `scope` keeps access and refresh tokens from being swapped for each
/// other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub scope: String,
    pub iat: usize,
    pub exp: usize,
}

/// Password hashing plus access/refresh token minting, keyed by a shared
/// signing secret. The application and the test harness each construct
/// their own instance.
pub struct AuthService {
    secret: String,
}

impl AuthService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn hash_password(&self, plain: &str) -> Result<String, AuthError> {
        password::hash_password(plain)
    }

    pub fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, AuthError> {
        password::verify_password(plain, hash)
    }

    pub fn create_access_token(&self, email: &str) -> Result<String, AuthError> {
        self.mint(email, SCOPE_ACCESS, Duration::minutes(ACCESS_TTL_MINUTES))
    }

    pub fn create_refresh_token(&self, email: &str) -> Result<String, AuthError> {
        self.mint(email, SCOPE_REFRESH, Duration::days(REFRESH_TTL_DAYS))
    }

    /// Validate an access token and return the subject email.
    pub fn decode_access_token(&self, token: &str) -> Result<String, AuthError> {
        self.decode_scoped(token, SCOPE_ACCESS)
    }

    /// Validate a refresh token and return the subject email.
    pub fn decode_refresh_token(&self, token: &str) -> Result<String, AuthError> {
        self.decode_scoped(token, SCOPE_REFRESH)
    }

    fn mint(&self, email: &str, scope: &'static str, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            scope: scope.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    fn decode_scoped(&self, token: &str, expected: &'static str) -> Result<String, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        if data.claims.scope != expected {
            return Err(AuthError::Scope {
                expected,
                actual: data.claims.scope,
            });
        }

        Ok(data.claims.sub)
    }
}
