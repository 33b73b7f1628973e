use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::warn;

use aperture_db::models::{NewPicture, PictureRow};
use aperture_types::api::{CreatePictureRequest, PictureResponse};

use crate::middleware::CurrentUser;
use crate::{AppState, internal, parse_sqlite_timestamp};

pub async fn create_picture(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreatePictureRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.picture_name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let tags = serde_json::to_string(&req.tags).map_err(internal)?;

    let id = state
        .db
        .insert_picture(&NewPicture {
            user_id: current.id,
            rating: 0.0,
            picture_name: &req.picture_name,
            description: &req.description,
            tags: &tags,
        })
        .map_err(internal)?;

    let rows = state.db.pictures_for_user(current.id).map_err(internal)?;
    let row = rows
        .iter()
        .find(|p| p.id == id)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((StatusCode::CREATED, Json(to_picture_response(row))))
}

pub async fn get_pictures(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state.db.pictures_for_user(current.id).map_err(internal)?;

    let pictures: Vec<PictureResponse> = rows.iter().map(to_picture_response).collect();
    Ok(Json(pictures))
}

fn to_picture_response(row: &PictureRow) -> PictureResponse {
    let tags = serde_json::from_str(&row.tags).unwrap_or_else(|e| {
        warn!("Corrupt tags '{}' on picture {}: {}", row.tags, row.id, e);
        Vec::new()
    });

    PictureResponse {
        id: row.id,
        user_id: row.user_id,
        rating: row.rating,
        picture_name: row.picture_name.clone(),
        description: row.description.clone(),
        tags,
        created_at: parse_sqlite_timestamp(&row.created_at),
    }
}
