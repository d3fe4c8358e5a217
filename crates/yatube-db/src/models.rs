//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the yatube-types API models so the DB layer stays
//! independent. Timestamps are the stored RFC 3339 strings.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileRow {
    pub user_id: String,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    pub instagram: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GroupRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A post joined with its author, its group (if any) and its vote counts.
#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: i64,
    pub text: String,
    pub pub_date: String,
    pub image: Option<String>,
    pub author_id: String,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub likes: u64,
    pub dislikes: u64,
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub author_id: String,
    pub author_username: String,
    pub text: String,
    pub created: String,
    pub updated: String,
    pub active: bool,
}

/// One owner-scoped copy of a direct message.
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub user_id: String,
    pub sender_id: String,
    pub sender_username: String,
    pub recipient_id: String,
    pub recipient_username: String,
    pub body: String,
    pub created_at: String,
    pub is_read: bool,
}

/// Aggregate of one owner's rows for a single counterpart.
#[derive(Debug, Clone)]
pub struct ConversationRow {
    pub counterpart_id: String,
    pub counterpart_username: String,
    pub last: String,
    pub unread: u64,
}

/// Like/dislike membership of one user on one post, plus totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteState {
    pub liked: bool,
    pub disliked: bool,
    pub likes: u64,
    pub dislikes: u64,
}
