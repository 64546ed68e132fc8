use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::object_id::ObjectId;

/// Per-edge state machine: `pending --accept--> accepted`; either state is
/// removed by unfollow. There is no transition back to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowStatus {
    Pending,
    Accepted,
}

impl FollowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FollowStatus::Pending => "pending",
            FollowStatus::Accepted => "accepted",
        }
    }
}

impl FromStr for FollowStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pending" => Ok(FollowStatus::Pending),
            "accepted" => Ok(FollowStatus::Accepted),
            other => Err(format!("unknown follow status: {other}")),
        }
    }
}

/// A follow relationship edge. `user_id` is the follower, `following_id`
/// the target; accepted visibility is directional, follower toward target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub following_id: ObjectId,
    pub status: FollowStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(user_id: ObjectId, following_id: ObjectId, status: FollowStatus) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            user_id,
            following_id,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("pending".parse::<FollowStatus>(), Ok(FollowStatus::Pending));
        assert_eq!(
            "accepted".parse::<FollowStatus>(),
            Ok(FollowStatus::Accepted)
        );
        assert_eq!(FollowStatus::Pending.as_str(), "pending");
        assert_eq!(FollowStatus::Accepted.as_str(), "accepted");
        assert!("rejected".parse::<FollowStatus>().is_err());
    }

    #[test]
    fn new_edge_keeps_requested_status() {
        let follower = ObjectId::new();
        let target = ObjectId::new();
        let edge = Follow::new(follower.clone(), target.clone(), FollowStatus::Pending);
        assert_eq!(edge.user_id, follower);
        assert_eq!(edge.following_id, target);
        assert_eq!(edge.status, FollowStatus::Pending);
        assert_eq!(edge.created_at, edge.updated_at);
    }
}
