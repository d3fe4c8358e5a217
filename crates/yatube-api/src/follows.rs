use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use yatube_types::api::Claims;

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::error::ApiError;

/// POST /profile/{username}/follow/. Following yourself is silently ignored.
pub async fn follow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    let user_id = claims.sub.to_string();
    let created = with_db(&state, move |db| {
        let Some(author) = db.get_user_by_username(&username)? else {
            return Ok(None);
        };
        if author.id == user_id {
            return Ok(Some(false));
        }
        db.follow(&user_id, &author.id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    if created {
        debug!("{} followed a new author", claims.username);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    let user_id = claims.sub.to_string();
    with_db(&state, move |db| {
        let Some(author) = db.get_user_by_username(&username)? else {
            return Ok(None);
        };
        db.unfollow(&user_id, &author.id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(StatusCode::NO_CONTENT)
}
