pub mod auth;
pub mod messages;
pub mod middleware;
pub mod pictures;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, warn};

use aperture_auth::AuthService;
use aperture_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub auth: AuthService,
}

/// Build the application router around an explicit state handle. Tests
/// construct this with their own database and secret; there is no global
/// wiring to override.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh_token", get(auth::refresh_token))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/users/me", get(users::me))
        .route("/api/messages", post(messages::send_message))
        .route("/api/messages", get(messages::get_messages))
        .route("/api/pictures", post(pictures::create_picture))
        .route("/api/pictures", get(pictures::get_pictures))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}

pub(crate) fn internal<E: std::fmt::Display>(err: E) -> StatusCode {
    error!("internal error: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

pub(crate) fn parse_sqlite_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}': {}", raw, e);
            DateTime::default()
        })
}
