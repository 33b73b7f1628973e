use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use aperture_db::models::NewUser;
use aperture_types::api::{LoginRequest, SignupRequest, TokenBundle};

use crate::middleware::bearer_token;
use crate::users::to_user_response;
use crate::{AppState, internal};

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    if state
        .db
        .user_by_email(&req.email)
        .map_err(internal)?
        .is_some()
    {
        return Err(StatusCode::CONFLICT);
    }

    let password_hash = state.auth.hash_password(&req.password).map_err(internal)?;

    let id = state
        .db
        .insert_user(&NewUser {
            id: None,
            username: &req.username,
            email: &req.email,
            password: &password_hash,
            admin: false,
        })
        .map_err(internal)?;

    let row = state
        .db
        .user_by_id(id)
        .map_err(internal)?
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(to_user_response(&row))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .db
        .user_by_email(&req.email)
        .map_err(internal)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Unconfirmed accounts cannot log in, even with the right password.
    if !user.confirmed {
        return Err(StatusCode::UNAUTHORIZED);
    }

    if !state
        .auth
        .verify_password(&req.password, &user.password)
        .map_err(internal)?
    {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let bundle = issue_tokens(&state, &user.email)?;
    Ok(Json(bundle))
}

/// Exchange a valid refresh token for a fresh bundle. The presented
/// token must match the one stored on the user row; a stale token
/// revokes the stored one.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let token = bearer_token(&headers).ok_or(StatusCode::UNAUTHORIZED)?;

    let email = state
        .auth
        .decode_refresh_token(token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = state
        .db
        .user_by_email(&email)
        .map_err(internal)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if user.refresh_token.as_deref() != Some(token) {
        state
            .db
            .set_refresh_token(&email, None)
            .map_err(internal)?;
        return Err(StatusCode::UNAUTHORIZED);
    }

    let bundle = issue_tokens(&state, &email)?;
    Ok(Json(bundle))
}

fn issue_tokens(state: &AppState, email: &str) -> Result<TokenBundle, StatusCode> {
    let access_token = state.auth.create_access_token(email).map_err(internal)?;
    let refresh_token = state.auth.create_refresh_token(email).map_err(internal)?;

    state
        .db
        .set_refresh_token(email, Some(&refresh_token))
        .map_err(internal)?;

    Ok(TokenBundle {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
    })
}
