use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal identity reference embedded in posts, comments and messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

/// Biographical fields attached one-to-one to an identity.
/// `profile_photo` is a media path as returned by the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    pub instagram: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}
