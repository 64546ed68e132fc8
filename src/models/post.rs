use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

use crate::models::object_id::ObjectId;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    /// Stored paths, in upload order.
    pub images: Vec<String>,
    pub posted_by: ObjectId,
    #[serde(skip)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// A post starts with an empty image list; the stored paths are patched
    /// in once the files are written under the post-specific directory.
    pub fn new(posted_by: ObjectId, title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            title,
            description,
            images: Vec::new(),
            posted_by,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Row> for Post {
    fn from(row: &Row) -> Self {
        Self {
            id: ObjectId::from_store(row.get("id")),
            title: row.get("title"),
            description: row.get("description"),
            images: row.get("images"),
            posted_by: ObjectId::from_store(row.get("posted_by")),
            is_deleted: row.get("is_deleted"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// Author fields joined into a post read; sensitive fields are never
/// selected in the first place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithAuthor {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub posted_by: PostAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to a `posts` row.
#[derive(Debug, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.images.is_none()
    }
}
