use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use aperture_db::models::MessageRow;
use aperture_types::api::{MessageResponse, SendMessageRequest};

use crate::middleware::CurrentUser;
use crate::{AppState, internal, parse_sqlite_timestamp};

pub async fn send_message(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.content.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Run blocking DB work off the async runtime
    let db = state.clone();
    let sender_id = current.id;
    let receiver_id = req.receiver_id;
    let content = req.content;

    let row = tokio::task::spawn_blocking(move || -> Result<MessageRow, StatusCode> {
        // Reject an unknown receiver up front instead of surfacing the
        // foreign-key violation as a 500.
        if db
            .db
            .user_by_id(receiver_id)
            .map_err(internal)?
            .is_none()
        {
            return Err(StatusCode::NOT_FOUND);
        }

        let id = db
            .db
            .insert_message(sender_id, receiver_id, &content)
            .map_err(internal)?;

        db.db
            .message_by_id(id)
            .map_err(internal)?
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok((StatusCode::CREATED, Json(to_message_response(&row))))
}

/// All messages the caller sent or received, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let user_id = current.id;

    let rows = tokio::task::spawn_blocking(move || db.db.messages_for_user(user_id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(internal)?;

    let messages: Vec<MessageResponse> = rows.iter().map(to_message_response).collect();
    Ok(Json(messages))
}

fn to_message_response(row: &MessageRow) -> MessageResponse {
    MessageResponse {
        id: row.id,
        sender_id: row.sender_id,
        receiver_id: row.receiver_id,
        content: row.content.clone(),
        created_at: parse_sqlite_timestamp(&row.created_at),
    }
}
