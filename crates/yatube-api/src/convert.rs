//! Row to wire-type conversions. Corrupt stored values are logged and
//! replaced with defaults instead of failing the whole response.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use yatube_db::models::{
    CommentRow, ConversationRow, GroupRow, MessageRow, PostRow, ProfileRow, UserRow,
};
use yatube_types::api::{
    CommentResponse, ConversationSummary, DirectMessageResponse, GroupResponse, PostResponse,
    ProfileResponse,
};
use yatube_types::models::{GroupSummary, ProfileInfo, UserSummary};

pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Rows written by SQLite's datetime('now') carry no zone.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub fn user_summary(id: &str, username: &str) -> UserSummary {
    UserSummary {
        id: id.parse().unwrap_or_else(|e| {
            warn!("Corrupt user id '{}' for '{}': {}", id, username, e);
            Uuid::default()
        }),
        username: username.to_string(),
    }
}

pub fn post_response(row: PostRow) -> PostResponse {
    let group = match (row.group_id, row.group_title, row.group_slug) {
        (Some(id), Some(title), Some(slug)) => Some(GroupSummary { id, title, slug }),
        _ => None,
    };
    PostResponse {
        id: row.id,
        author: user_summary(&row.author_id, &row.author_username),
        pub_date: parse_timestamp(&row.pub_date),
        text: row.text,
        image: row.image,
        group,
        likes: row.likes,
        dislikes: row.dislikes,
    }
}

pub fn comment_response(row: CommentRow) -> CommentResponse {
    CommentResponse {
        id: row.id,
        post_id: row.post_id,
        author: user_summary(&row.author_id, &row.author_username),
        created: parse_timestamp(&row.created),
        updated: parse_timestamp(&row.updated),
        text: row.text,
        active: row.active,
    }
}

pub fn group_response(row: GroupRow) -> GroupResponse {
    GroupResponse {
        id: row.id,
        title: row.title,
        slug: row.slug,
        description: row.description,
    }
}

pub fn message_response(row: MessageRow) -> DirectMessageResponse {
    DirectMessageResponse {
        id: row.id,
        sender: user_summary(&row.sender_id, &row.sender_username),
        counterpart: user_summary(&row.recipient_id, &row.recipient_username),
        created_at: parse_timestamp(&row.created_at),
        body: row.body,
        is_read: row.is_read,
    }
}

pub fn conversation_summary(row: ConversationRow) -> ConversationSummary {
    ConversationSummary {
        counterpart: user_summary(&row.counterpart_id, &row.counterpart_username),
        last: parse_timestamp(&row.last),
        unread: row.unread,
    }
}

pub fn profile_info(row: ProfileRow) -> ProfileInfo {
    let date_of_birth = row.date_of_birth.as_deref().and_then(|raw| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| warn!("Corrupt date_of_birth '{}' for {}: {}", raw, row.user_id, e))
            .ok()
    });
    ProfileInfo {
        bio: row.bio,
        profile_photo: row.profile_photo,
        instagram: row.instagram,
        date_of_birth,
    }
}

pub fn profile_response(user: UserRow, profile: Option<ProfileRow>) -> ProfileResponse {
    ProfileResponse {
        user: user_summary(&user.id, &user.username),
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        profile: profile.map(profile_info).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_stored_and_legacy_timestamps() {
        let stored = parse_timestamp("2026-03-01T12:30:45.123456Z");
        assert_eq!(stored.hour(), 12);
        assert_eq!(stored.nanosecond(), 123_456_000);

        let legacy = parse_timestamp("2026-03-01 12:30:45");
        assert_eq!(legacy.minute(), 30);

        assert_eq!(parse_timestamp("garbage"), DateTime::<Utc>::default());
    }

    #[test]
    fn post_without_complete_group_has_none() {
        let row = PostRow {
            id: 1,
            text: "t".into(),
            pub_date: "2026-03-01T12:30:45.000000Z".into(),
            image: None,
            author_id: Uuid::new_v4().to_string(),
            author_username: "leo".into(),
            group_id: None,
            group_title: None,
            group_slug: None,
            likes: 2,
            dislikes: 0,
        };
        let post = post_response(row);
        assert!(post.group.is_none());
        assert_eq!(post.likes, 2);
        assert_eq!(post.pub_date.year(), 2026);
    }

    #[test]
    fn bad_birth_date_is_dropped() {
        let info = profile_info(ProfileRow {
            user_id: "u".into(),
            date_of_birth: Some("31/12/1999".into()),
            bio: Some("hi".into()),
            ..Default::default()
        });
        assert!(info.date_of_birth.is_none());
        assert_eq!(info.bio.as_deref(), Some("hi"));
    }
}
