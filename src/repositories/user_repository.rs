use chrono::Utc;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;

use crate::errors::ApiError;
use crate::models::object_id::ObjectId;
use crate::models::user::{User, UserPatch};
use crate::repositories::like_pattern;

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool,
}

impl UserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn find_active_by_id(&self, id: &ObjectId) -> Result<Option<User>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT * FROM users WHERE id = $1 AND is_deleted = FALSE",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(User::from))
    }

    pub async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT * FROM users WHERE email = $1 AND is_deleted = FALSE",
                &[&email],
            )
            .await?;
        Ok(row.as_ref().map(User::from))
    }

    /// Uniqueness pre-check for signup. The check deliberately spans
    /// soft-deleted rows: deletion frees the email slot by mutating it,
    /// but the username stays reserved.
    pub async fn email_or_username_taken(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT 1 FROM users WHERE email = $1 OR username = $2",
                &[&email, &username],
            )
            .await?;
        Ok(row.is_some())
    }

    pub async fn insert(&self, user: &User) -> Result<(), ApiError> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO users
                   (id, first_name, last_name, email, username, password,
                    bio, profile_image, is_private, is_deleted, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
                &[
                    &user.id.as_str(),
                    &user.first_name,
                    &user.last_name,
                    &user.email,
                    &user.username,
                    &user.password,
                    &user.bio,
                    &user.profile_image,
                    &user.is_private,
                    &user.is_deleted,
                    &user.created_at,
                    &user.updated_at,
                ],
            )
            .await?;
        Ok(())
    }

    /// Profile read with follower/following counts over accepted edges.
    pub async fn profile_with_counts(
        &self,
        id: &ObjectId,
    ) -> Result<Option<(User, i64, i64)>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT u.*,
                        (SELECT COUNT(*) FROM follows f
                          WHERE f.following_id = u.id AND f.status = 'accepted') AS total_followers,
                        (SELECT COUNT(*) FROM follows f
                          WHERE f.user_id = u.id AND f.status = 'accepted') AS total_following
                 FROM users u
                 WHERE u.id = $1 AND u.is_deleted = FALSE",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.map(|row| {
            (
                User::from(&row),
                row.get("total_followers"),
                row.get("total_following"),
            )
        }))
    }

    /// User search: present filters are ANDed, both case-insensitive
    /// substring matches.
    pub async fn search(
        &self,
        name: Option<&str>,
        username: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<User>, ApiError> {
        let client = self.pool.get().await?;
        let name_pattern = name.map(like_pattern);
        let username_pattern = username.map(like_pattern);
        let rows = client
            .query(
                "SELECT * FROM users
                 WHERE is_deleted = FALSE
                   AND ($1::TEXT IS NULL OR first_name ILIKE $1)
                   AND ($2::TEXT IS NULL OR username ILIKE $2)
                 ORDER BY created_at ASC
                 OFFSET $3 LIMIT $4",
                &[&name_pattern, &username_pattern, &offset, &limit],
            )
            .await?;
        Ok(rows.iter().map(User::from).collect())
    }

    pub async fn update(&self, id: &ObjectId, patch: &UserPatch) -> Result<Option<User>, ApiError> {
        let client = self.pool.get().await?;

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        if let Some(first_name) = &patch.first_name {
            params.push(first_name);
            sets.push(format!("first_name = ${}", params.len()));
        }
        if let Some(last_name) = &patch.last_name {
            params.push(last_name);
            sets.push(format!("last_name = ${}", params.len()));
        }
        if let Some(bio) = &patch.bio {
            params.push(bio);
            sets.push(format!("bio = ${}", params.len()));
        }
        if let Some(is_private) = &patch.is_private {
            params.push(is_private);
            sets.push(format!("is_private = ${}", params.len()));
        }
        if let Some(profile_image) = &patch.profile_image {
            params.push(profile_image);
            sets.push(format!("profile_image = ${}", params.len()));
        }

        let now = Utc::now();
        params.push(&now);
        sets.push(format!("updated_at = ${}", params.len()));

        let id_value = id.as_str();
        params.push(&id_value);
        let sql = format!(
            "UPDATE users SET {} WHERE id = ${} AND is_deleted = FALSE RETURNING *",
            sets.join(", "),
            params.len()
        );

        let row = client.query_opt(&sql, &params).await?;
        Ok(row.as_ref().map(User::from))
    }

    /// Soft delete: the row stays, the unique email slot is freed by
    /// rewriting it to the caller-supplied mutated value.
    pub async fn soft_delete(&self, id: &ObjectId, mutated_email: &str) -> Result<bool, ApiError> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                "UPDATE users
                 SET is_deleted = TRUE, email = $2, updated_at = now()
                 WHERE id = $1 AND is_deleted = FALSE",
                &[&id.as_str(), &mutated_email],
            )
            .await?;
        Ok(updated > 0)
    }
}
