use chrono::Utc;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

use crate::errors::ApiError;
use crate::models::object_id::ObjectId;
use crate::models::post::{Post, PostAuthor, PostPatch, PostWithAuthor};
use crate::repositories::like_pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Clone)]
pub struct PostRepository {
    pool: Pool,
}

impl PostRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, post: &Post) -> Result<(), ApiError> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO posts
                   (id, title, description, images, posted_by, is_deleted, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &post.id.as_str(),
                    &post.title,
                    &post.description,
                    &post.images,
                    &post.posted_by.as_str(),
                    &post.is_deleted,
                    &post.created_at,
                    &post.updated_at,
                ],
            )
            .await?;
        Ok(())
    }

    /// Patches the stored image paths in once the files have been written.
    pub async fn set_images(
        &self,
        id: &ObjectId,
        images: &[String],
    ) -> Result<Option<Post>, ApiError> {
        let client = self.pool.get().await?;
        let images: Vec<&str> = images.iter().map(String::as_str).collect();
        let row = client
            .query_opt(
                "UPDATE posts SET images = $2, updated_at = now()
                 WHERE id = $1
                 RETURNING *",
                &[&id.as_str(), &images],
            )
            .await?;
        Ok(row.as_ref().map(Post::from))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT * FROM posts WHERE id = $1 AND is_deleted = FALSE",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(Post::from))
    }

    /// Single-post read with the author joined in; authors who soft-deleted
    /// their account make the post invisible.
    pub async fn find_with_author(&self, id: &ObjectId) -> Result<Option<PostWithAuthor>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT p.id, p.title, p.description, p.images, p.created_at, p.updated_at,
                        u.id AS author_id, u.first_name, u.last_name, u.username,
                        u.bio, u.profile_image, u.is_private
                 FROM posts p
                 JOIN users u ON u.id = p.posted_by
                 WHERE p.id = $1 AND p.is_deleted = FALSE AND u.is_deleted = FALSE",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(map_post_with_author))
    }

    /// The feed aggregation: posts whose author is the caller or someone the
    /// caller follows with an accepted edge, optionally filtered by a search
    /// term ORed over title / author first name / author username, sorted by
    /// creation time and paginated. The window count covers the filtered set
    /// before pagination.
    pub async fn feed(
        &self,
        caller: &ObjectId,
        search: Option<&str>,
        order: SortOrder,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PostWithAuthor>, i64), ApiError> {
        let client = self.pool.get().await?;
        let pattern = search.map(like_pattern);
        let caller_id = caller.as_str();
        let sql = format!(
            "SELECT p.id, p.title, p.description, p.images, p.created_at, p.updated_at,
                    u.id AS author_id, u.first_name, u.last_name, u.username,
                    u.bio, u.profile_image, u.is_private,
                    COUNT(*) OVER () AS total_count
             FROM posts p
             JOIN users u ON u.id = p.posted_by AND u.is_deleted = FALSE
             WHERE p.is_deleted = FALSE
               AND (p.posted_by = $1 OR EXISTS (
                     SELECT 1 FROM follows f
                     WHERE f.user_id = $1
                       AND f.following_id = p.posted_by
                       AND f.status = 'accepted'))
               AND ($2::TEXT IS NULL
                    OR p.title ILIKE $2
                    OR u.first_name ILIKE $2
                    OR u.username ILIKE $2)
             ORDER BY p.created_at {}
             OFFSET $3 LIMIT $4",
            order.sql()
        );

        let rows = client
            .query(&sql, &[&caller_id, &pattern, &offset, &limit])
            .await?;
        let total = rows
            .first()
            .map_or(0, |row| row.get::<_, i64>("total_count"));
        let posts = rows.iter().map(map_post_with_author).collect();
        Ok((posts, total))
    }

    pub async fn update(&self, id: &ObjectId, patch: &PostPatch) -> Result<Option<Post>, ApiError> {
        let client = self.pool.get().await?;

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        if let Some(title) = &patch.title {
            params.push(title);
            sets.push(format!("title = ${}", params.len()));
        }
        if let Some(description) = &patch.description {
            params.push(description);
            sets.push(format!("description = ${}", params.len()));
        }
        if let Some(images) = &patch.images {
            params.push(images);
            sets.push(format!("images = ${}", params.len()));
        }

        let now = Utc::now();
        params.push(&now);
        sets.push(format!("updated_at = ${}", params.len()));

        let id_value = id.as_str();
        params.push(&id_value);
        let sql = format!(
            "UPDATE posts SET {} WHERE id = ${} AND is_deleted = FALSE RETURNING *",
            sets.join(", "),
            params.len()
        );

        let row = client.query_opt(&sql, &params).await?;
        Ok(row.as_ref().map(Post::from))
    }

    /// Permanent removal; the caller is responsible for the image directory.
    pub async fn delete(&self, id: &ObjectId) -> Result<bool, ApiError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM posts WHERE id = $1", &[&id.as_str()])
            .await?;
        Ok(deleted > 0)
    }
}

fn map_post_with_author(row: &Row) -> PostWithAuthor {
    PostWithAuthor {
        id: ObjectId::from_store(row.get("id")),
        title: row.get("title"),
        description: row.get("description"),
        images: row.get("images"),
        posted_by: PostAuthor {
            id: ObjectId::from_store(row.get("author_id")),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            username: row.get("username"),
            bio: row.get("bio"),
            profile_image: row.get("profile_image"),
            is_private: row.get("is_private"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
