use serde::Deserialize;

/// Body for follow / unfollow / accept-request: the other user's id, raw so
/// the service can reject malformed values with the right error.
#[derive(Debug, Deserialize)]
pub struct FollowTargetIn {
    pub id: String,
}
