use serde::Deserialize;

use crate::dtos::post_dtos::ImageUpload;

/// Search filters for `GET /api/users`; present filters are ANDed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub name: Option<String>,
    pub username: Option<String>,
    pub page_number: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserIn {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub is_private: Option<bool>,
    pub profile: Option<ImageUpload>,
}
