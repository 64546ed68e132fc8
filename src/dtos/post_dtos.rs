use serde::{Deserialize, Serialize};

use crate::models::post::PostWithAuthor;

/// One uploaded image: base64 payload plus the client-declared metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    /// Base64 data, with or without a `data:image/...;base64,` prefix.
    pub image_data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostIn {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageUpload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostIn {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<ImageUpload>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub search_text: Option<String>,
    pub page_number: Option<i64>,
    pub limit: Option<i64>,
    /// "dec" sorts newest first; anything else is ascending.
    pub sort: Option<String>,
}

/// One feed page plus the total over the unpaginated filtered set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub posts: Vec<PostWithAuthor>,
    pub total_post: i64,
}
