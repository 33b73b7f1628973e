use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use aperture_db::models::UserRow;
use aperture_types::api::UserResponse;

use crate::middleware::CurrentUser;
use crate::{AppState, internal};

pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, StatusCode> {
    let row = state
        .db
        .user_by_email(&current.email)
        .map_err(internal)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(to_user_response(&row)))
}

pub(crate) fn to_user_response(row: &UserRow) -> UserResponse {
    UserResponse {
        id: row.id,
        username: row.username.clone(),
        email: row.email.clone(),
        admin: row.admin,
        confirmed: row.confirmed,
    }
}
