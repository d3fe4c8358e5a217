//! Direct-message inbox.
//!
//! Storage keeps one copy of each message per participant (see
//! `yatube_db::queries::messages`); these handlers only ever look at the
//! caller's own copies.

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use tracing::{info, warn};

use yatube_db::Database;
use yatube_db::models::ConversationRow;
use yatube_types::api::{
    Claims, InboxResponse, SendDirectRequest, UnreadResponse, UserSearchQuery, UserSearchResponse,
};
use yatube_types::pagination::{Paginator, USERS_PER_PAGE};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::convert::{conversation_summary, message_response, profile_info, user_summary};
use crate::error::ApiError;

pub const MAX_BODY_CHARS: usize = 1000;

/// `me`'s conversation list with the thread against `counterpart_id` opened:
/// its rows are marked read first and its badge reports zero.
fn open_thread(
    db: &Database,
    me: &str,
    conversations: Vec<ConversationRow>,
    counterpart_id: Option<&str>,
) -> anyhow::Result<InboxResponse> {
    let mut conversations: Vec<_> = conversations.into_iter().map(conversation_summary).collect();

    let Some(counterpart_id) = counterpart_id else {
        return Ok(InboxResponse {
            conversations,
            active_direct: None,
            directs: None,
            counterpart_profile: None,
        });
    };

    db.mark_thread_read(me, counterpart_id)?;
    let directs: Vec<_> = db
        .thread(me, counterpart_id)?
        .into_iter()
        .map(message_response)
        .collect();

    let counterpart = db.get_user_by_id(counterpart_id)?;
    for conversation in &mut conversations {
        if conversation.counterpart.id.to_string() == counterpart_id {
            conversation.unread = 0;
        }
    }

    Ok(InboxResponse {
        conversations,
        active_direct: counterpart.map(|u| u.username),
        directs: Some(directs),
        counterpart_profile: None,
    })
}

/// GET /directs/: conversation list, most recent thread opened.
pub async fn inbox(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let me = claims.sub.to_string();
    let inbox = with_db(&state, move |db| {
        let conversations = db.conversations(&me)?;
        let latest = conversations.first().map(|c| c.counterpart_id.clone());
        open_thread(db, &me, conversations, latest.as_deref())
    })
    .await?;

    Ok(Json(inbox))
}

/// GET /directs/{username}: conversation list with the named thread opened.
pub async fn thread(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let me = claims.sub.to_string();
    let inbox = with_db(&state, move |db| {
        let Some(counterpart) = db.get_user_by_username(&username)? else {
            return Ok(None);
        };
        let conversations = db.conversations(&me)?;
        let mut inbox = open_thread(db, &me, conversations, Some(counterpart.id.as_str()))?;
        inbox.counterpart_profile = db.get_profile(&counterpart.id)?.map(profile_info);
        Ok(Some(inbox))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(inbox))
}

/// GET /directs-unread/: badge count across all conversations.
pub async fn unread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let me = claims.sub.to_string();
    let unread = with_db(&state, move |db| db.unread_total(&me)).await?;
    Ok(Json(UnreadResponse { unread }))
}

/// GET /new/?q=: username substring search. No query, no results.
pub async fn user_search(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let needle = query.q.filter(|q| !q.is_empty());
    let Some(needle) = needle else {
        return Ok(Json(UserSearchResponse {
            query: None,
            users: None,
        }));
    };

    let requested = query.page;
    let q = needle.clone();
    let page = with_db(&state, move |db| {
        let paginator = Paginator::new(db.count_users_matching(&q)?, USERS_PER_PAGE);
        let number = paginator.resolve(requested.as_deref());
        let rows = db.search_users(&q, paginator.per_page(), paginator.offset(number))?;
        Ok(paginator.page(number, rows))
    })
    .await?;

    Ok(Json(UserSearchResponse {
        query: Some(needle),
        users: Some(page.map(|u| user_summary(&u.id, &u.username))),
    }))
}

/// GET /new/{username}: open a conversation by sending an empty message.
/// Any failure to find the user sends the caller back to the search page.
pub async fn new_conversation(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Redirect, ApiError> {
    let lookup = username.clone();
    let to_user = match with_db(&state, move |db| db.get_user_by_username(&lookup)).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(Redirect::to("/new/")),
        Err(e) => {
            warn!("Lookup of '{}' for new conversation failed: {}", username, e);
            return Ok(Redirect::to("/new/"));
        }
    };

    let me = claims.sub.to_string();
    if to_user.id != me {
        with_db(&state, move |db| db.send_message(&me, &to_user.id, "")).await?;
        info!("{} started a conversation with {}", claims.username, username);
    }
    Ok(Redirect::to("/directs/"))
}

/// POST /send/ (form: `to_user`, `body`). Answers with the sender's copy.
pub async fn send_direct(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Form(req): Form<SendDirectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let body = req.body.unwrap_or_default();
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(ApiError::bad_request("message body is limited to 1000 characters"));
    }

    let me = claims.sub.to_string();
    let to_user = req.to_user;
    let sent = with_db(&state, move |db| {
        let Some(recipient) = db.get_user_by_username(&to_user)? else {
            return Ok(Err(ApiError::NotFound));
        };
        if recipient.id == me {
            return Ok(Err(ApiError::bad_request("cannot send a message to yourself")));
        }
        let id = db.send_message(&me, &recipient.id, &body)?;
        Ok(Ok(db.get_message(id)?))
    })
    .await??
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("sent message vanished")))?;

    Ok((StatusCode::CREATED, Json(message_response(sent))))
}
