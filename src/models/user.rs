use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

use crate::models::object_id::ObjectId;

/// Full `users` row, including the password hash and the soft-delete flag.
/// Never serialized; the wire type is [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub is_private: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        username: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            first_name,
            last_name,
            email,
            username,
            password: password_hash,
            bio: None,
            profile_image: None,
            is_private: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Row> for User {
    fn from(row: &Row) -> Self {
        Self {
            id: ObjectId::from_store(row.get("id")),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            username: row.get("username"),
            password: row.get("password"),
            bio: row.get("bio"),
            profile_image: row.get("profile_image"),
            is_private: row.get("is_private"),
            is_deleted: row.get("is_deleted"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// What goes over the wire: password and soft-delete flag stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            username: user.username,
            bio: user.bio,
            profile_image: user.profile_image,
            is_private: user.is_private,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile view with follower counts over accepted edges.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub total_followers: i64,
    pub total_following: i64,
}

/// Partial update applied to a `users` row.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub is_private: Option<bool>,
    pub profile_image: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.is_private.is_none()
            && self.profile_image.is_none()
    }
}
