use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use yatube_db::Vote;
use yatube_types::api::{Claims, LikeState};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::error::ApiError;

/// POST /{post_id}/like/
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    toggle(&state, post_id, &claims, Vote::Like).await
}

/// POST /{post_id}/dislike/
pub async fn toggle_dislike(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    toggle(&state, post_id, &claims, Vote::Dislike).await
}

async fn toggle(
    state: &AppState,
    post_id: i64,
    claims: &Claims,
    vote: Vote,
) -> Result<Json<LikeState>, ApiError> {
    let user_id = claims.sub.to_string();
    let votes = with_db(state, move |db| db.toggle_vote(post_id, &user_id, vote))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(LikeState {
        post_id,
        liked: votes.liked,
        disliked: votes.disliked,
        likes: votes.likes,
        dislikes: votes.dislikes,
    }))
}
