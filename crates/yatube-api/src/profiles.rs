use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use yatube_db::PostFilter;
use yatube_db::models::ProfileRow;
use yatube_types::api::{AuthorPageResponse, Claims, EditProfileRequest, PageQuery};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::convert::profile_response;
use crate::error::ApiError;
use crate::middleware::Viewer;
use crate::posts::post_page;

const MAX_INSTAGRAM_LEN: usize = 50;

/// GET /profile/{username}/: the author's card plus a page of their posts.
pub async fn author_page(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Viewer(viewer): Viewer,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer_id = viewer.map(|c| c.sub.to_string());
    let (user, profile, post_count, following) = with_db(&state, move |db| {
        let Some(user) = db.get_user_by_username(&username)? else {
            return Ok(None);
        };
        let profile = db.get_profile(&user.id)?;
        let post_count = db.count_posts(&PostFilter::Author(user.id.clone()))?;
        let following = match viewer_id {
            Some(viewer_id) => db.is_following(&viewer_id, &user.id)?,
            None => false,
        };
        Ok(Some((user, profile, post_count, following)))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    let posts = post_page(&state, PostFilter::Author(user.id.clone()), query.page).await?;

    Ok(Json(AuthorPageResponse {
        author: profile_response(user, profile),
        post_count,
        following,
        posts,
    }))
}

/// GET /edit/
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = claims.sub.to_string();
    let (user, profile) = with_db(&state, move |db| {
        let Some(user) = db.get_user_by_id(&user_id)? else {
            return Ok(None);
        };
        let profile = db.get_profile(&user_id)?;
        Ok(Some((user, profile)))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(profile_response(user, profile)))
}

/// POST /edit/: fields left out of the body keep their current value.
pub async fn edit_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<EditProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req
        .instagram
        .as_ref()
        .is_some_and(|handle| handle.chars().count() > MAX_INSTAGRAM_LEN)
    {
        return Err(ApiError::bad_request("instagram must be at most 50 characters"));
    }

    let user_id = claims.sub.to_string();
    let (user, profile) = with_db(&state, move |db| {
        let Some(user) = db.get_user_by_id(&user_id)? else {
            return Ok(None);
        };
        let current = db.get_profile(&user_id)?.unwrap_or_else(|| ProfileRow {
            user_id: user_id.clone(),
            ..Default::default()
        });

        db.update_user_names(
            &user_id,
            req.first_name.as_deref().unwrap_or(&user.first_name),
            req.last_name.as_deref().unwrap_or(&user.last_name),
            req.email.as_deref().unwrap_or(&user.email),
        )?;
        db.upsert_profile(&ProfileRow {
            user_id: user_id.clone(),
            bio: req.bio.or(current.bio),
            profile_photo: req.profile_photo.or(current.profile_photo),
            instagram: req.instagram.or(current.instagram),
            date_of_birth: req
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .or(current.date_of_birth),
        })?;

        let user = db.get_user_by_id(&user_id)?;
        let profile = db.get_profile(&user_id)?;
        Ok(user.map(|u| (u, profile)))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(profile_response(user, profile)))
}
