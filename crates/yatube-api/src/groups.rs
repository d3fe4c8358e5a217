use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use yatube_types::api::{Claims, CreateGroupRequest, GroupResponse};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::convert::group_response;
use crate::error::ApiError;

const MAX_TITLE_LEN: usize = 200;

pub async fn list_groups(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let groups = with_db(&state, |db| db.list_groups()).await?;
    Ok(Json(
        groups.into_iter().map(group_response).collect::<Vec<_>>(),
    ))
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() || req.title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::bad_request("title must be 1-200 characters"));
    }
    if !is_slug(&req.slug) {
        return Err(ApiError::bad_request("slug may only contain letters, digits, '-' and '_'"));
    }

    let (title, slug, description) = (req.title.clone(), req.slug.clone(), req.description.clone());
    let id = with_db(&state, move |db| db.create_group(&title, &slug, &description))
        .await?
        .ok_or_else(|| ApiError::Conflict(format!("slug '{}' already exists", req.slug)))?;

    info!("{} created group {}", claims.username, req.slug);
    Ok((
        StatusCode::CREATED,
        Json(GroupResponse {
            id,
            title: req.title,
            slug: req.slug,
            description: req.description,
        }),
    ))
}

fn is_slug(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
