use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use yatube_types::api::{Claims, CommentRequest};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::convert::comment_response;
use crate::error::ApiError;

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::bad_request("comment text is required"));
    }

    let author_id = claims.sub.to_string();
    let comment = with_db(&state, move |db| {
        if db.get_post(post_id)?.is_none() {
            return Ok(None);
        }
        let id = db.create_comment(post_id, &author_id, &req.text)?;
        db.get_comment(id)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(comment_response(comment))))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    let comment = with_db(&state, move |db| db.get_comment(comment_id))
        .await?
        .ok_or(ApiError::NotFound)?;
    if comment.author_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }

    with_db(&state, move |db| db.delete_comment(comment_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
