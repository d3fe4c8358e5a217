use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GroupSummary, ProfileInfo, UserSummary};
use crate::pagination::Page;

// -- JWT Claims --

/// Bearer token claims. Issued by the auth handlers, checked by the auth
/// middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Pagination --

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

// -- Groups --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGroupRequest {
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPostsResponse {
    pub group: GroupResponse,
    pub posts: Page<PostResponse>,
}

// -- Posts --

/// Body for both post creation and post edit.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostRequest {
    pub text: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub group: Option<GroupSummary>,
    pub author: UserSummary,
    pub likes: u64,
    pub dislikes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub author_post_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeState {
    pub post_id: i64,
    pub liked: bool,
    pub disliked: bool,
    pub likes: u64,
    pub dislikes: u64,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub author: UserSummary,
    pub text: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub active: bool,
}

// -- Profiles --

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: UserSummary,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile: ProfileInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorPageResponse {
    pub author: ProfileResponse,
    pub post_count: u64,
    pub following: bool,
    pub posts: Page<PostResponse>,
}

/// Partial profile update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    pub instagram: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

// -- Direct messages --

/// Form body of `POST /send/`.
#[derive(Debug, Deserialize)]
pub struct SendDirectRequest {
    pub to_user: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// One row of the owner's copy of a conversation. `counterpart` is the other
/// party from the owner's point of view, not necessarily the destination.
#[derive(Debug, Clone, Serialize)]
pub struct DirectMessageResponse {
    pub id: i64,
    pub sender: UserSummary,
    pub counterpart: UserSummary,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub counterpart: UserSummary,
    pub last: DateTime<Utc>,
    pub unread: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InboxResponse {
    pub conversations: Vec<ConversationSummary>,
    pub active_direct: Option<String>,
    pub directs: Option<Vec<DirectMessageResponse>>,
    pub counterpart_profile: Option<ProfileInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadResponse {
    pub unread: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSearchResponse {
    pub query: Option<String>,
    pub users: Option<Page<UserSummary>>,
}

// -- Media --

#[derive(Debug, Clone, Serialize)]
pub struct MediaUploadResponse {
    pub path: String,
}
