use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;

use crate::errors::ApiError;
use crate::models::follow::{Follow, FollowStatus};
use crate::models::object_id::ObjectId;

/// Outcome of an edge insert. The unique index on (user_id, following_id)
/// is the authority on duplicates; a lost race surfaces here instead of in
/// an application-level lock.
#[derive(Debug, PartialEq, Eq)]
pub enum EdgeInsert {
    Created,
    Duplicate,
}

#[derive(Clone)]
pub struct FollowRepository {
    pool: Pool,
}

impl FollowRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        user_id: &ObjectId,
        following_id: &ObjectId,
    ) -> Result<Option<Follow>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT * FROM follows WHERE user_id = $1 AND following_id = $2",
                &[&user_id.as_str(), &following_id.as_str()],
            )
            .await?;
        row.as_ref().map(map_follow).transpose()
    }

    pub async fn insert(&self, edge: &Follow) -> Result<EdgeInsert, ApiError> {
        let client = self.pool.get().await?;
        let result = client
            .execute(
                "INSERT INTO follows (id, user_id, following_id, status, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &edge.id.as_str(),
                    &edge.user_id.as_str(),
                    &edge.following_id.as_str(),
                    &edge.status.as_str(),
                    &edge.created_at,
                    &edge.updated_at,
                ],
            )
            .await;

        match result {
            Ok(_) => Ok(EdgeInsert::Created),
            Err(err) if err.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Ok(EdgeInsert::Duplicate)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes the accepted edge only; a pending request is not removable
    /// through unfollow.
    pub async fn delete_accepted(
        &self,
        user_id: &ObjectId,
        following_id: &ObjectId,
    ) -> Result<Option<Follow>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "DELETE FROM follows
                 WHERE user_id = $1 AND following_id = $2 AND status = 'accepted'
                 RETURNING *",
                &[&user_id.as_str(), &following_id.as_str()],
            )
            .await?;
        row.as_ref().map(map_follow).transpose()
    }

    pub async fn set_accepted(&self, id: &ObjectId) -> Result<Option<Follow>, ApiError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "UPDATE follows SET status = 'accepted', updated_at = now()
                 WHERE id = $1
                 RETURNING *",
                &[&id.as_str()],
            )
            .await?;
        row.as_ref().map(map_follow).transpose()
    }

    pub async fn pending_for(&self, following_id: &ObjectId) -> Result<Vec<Follow>, ApiError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT * FROM follows
                 WHERE following_id = $1 AND status = 'pending'
                 ORDER BY created_at ASC",
                &[&following_id.as_str()],
            )
            .await?;
        rows.iter().map(map_follow).collect()
    }
}

fn map_follow(row: &Row) -> Result<Follow, ApiError> {
    let status: FollowStatus = row
        .get::<_, String>("status")
        .trim()
        .parse()
        .map_err(ApiError::Internal)?;
    Ok(Follow {
        id: ObjectId::from_store(row.get("id")),
        user_id: ObjectId::from_store(row.get("user_id")),
        following_id: ObjectId::from_store(row.get("following_id")),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
