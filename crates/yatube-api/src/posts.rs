use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use yatube_db::PostFilter;
use yatube_types::api::{
    Claims, GroupPostsResponse, PageQuery, PostDetailResponse, PostRequest, PostResponse,
};
use yatube_types::pagination::{POSTS_PER_PAGE, Page, Paginator};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::convert::{comment_response, group_response, post_response};
use crate::error::ApiError;

/// One page of posts matching `filter`, newest first.
pub(crate) async fn post_page(
    state: &AppState,
    filter: PostFilter,
    requested: Option<String>,
) -> Result<Page<PostResponse>, ApiError> {
    let page = with_db(state, move |db| {
        let paginator = Paginator::new(db.count_posts(&filter)?, POSTS_PER_PAGE);
        let number = paginator.resolve(requested.as_deref());
        let rows = db.list_posts(&filter, paginator.per_page(), paginator.offset(number))?;
        Ok(paginator.page(number, rows))
    })
    .await?;
    Ok(page.map(post_response))
}

/// GET /: served from the index cache while fresh.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(page) = state.index_cache.get(&query.page).await {
        return Ok(Json(page));
    }

    let page = post_page(&state, PostFilter::All, query.page.clone()).await?;
    state.index_cache.insert(query.page, page.clone()).await;
    Ok(Json(page))
}

pub async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let group = with_db(&state, move |db| db.get_group_by_slug(&slug))
        .await?
        .ok_or(ApiError::NotFound)?;

    let posts = post_page(&state, PostFilter::Group(group.id), query.page).await?;
    Ok(Json(GroupPostsResponse {
        group: group_response(group),
        posts,
    }))
}

pub async fn post_detail(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let (post, comments, author_post_count) = with_db(&state, move |db| {
        let Some(post) = db.get_post(post_id)? else {
            return Ok(None);
        };
        let comments = db.list_comments(post_id)?;
        let count = db.count_posts(&PostFilter::Author(post.author_id.clone()))?;
        Ok(Some((post, comments, count)))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(PostDetailResponse {
        post: post_response(post),
        comments: comments.into_iter().map(comment_response).collect(),
        author_post_count,
    }))
}

/// GET /follow/: posts by the authors the caller follows.
pub async fn follow_index(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = post_page(&state, PostFilter::FollowedBy(claims.sub.to_string()), query.page).await?;
    Ok(Json(page))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_post(&state, &req).await?;

    let author_id = claims.sub.to_string();
    let post = with_db(&state, move |db| {
        let id = db.create_post(&author_id, &req.text, req.group_id, req.image.as_deref())?;
        db.get_post(id)
    })
    .await?
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("post vanished after insert")))?;

    info!("{} published post {}", claims.username, post.id);
    Ok((StatusCode::CREATED, Json(post_response(post))))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_author(&state, post_id, &claims).await?;
    validate_post(&state, &req).await?;

    let post = with_db(&state, move |db| {
        db.update_post(post_id, &req.text, req.group_id, req.image.as_deref())?;
        db.get_post(post_id)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(post_response(post)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    ensure_author(&state, post_id, &claims).await?;
    with_db(&state, move |db| db.delete_post(post_id)).await?;

    info!("{} deleted post {}", claims.username, post_id);
    Ok(StatusCode::NO_CONTENT)
}

/// 404 if the post is missing, 403 if the caller did not write it.
async fn ensure_author(state: &AppState, post_id: i64, claims: &Claims) -> Result<(), ApiError> {
    let post = with_db(state, move |db| db.get_post(post_id))
        .await?
        .ok_or(ApiError::NotFound)?;
    if post.author_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

async fn validate_post(state: &AppState, req: &PostRequest) -> Result<(), ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::bad_request("post text is required"));
    }
    if let Some(group_id) = req.group_id {
        let exists = with_db(state, move |db| db.get_group_by_id(group_id))
            .await?
            .is_some();
        if !exists {
            return Err(ApiError::bad_request(format!("unknown group {group_id}")));
        }
    }
    Ok(())
}
