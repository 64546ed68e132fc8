use crate::errors::ApiError;
use crate::models::follow::{Follow, FollowStatus};
use crate::models::object_id::ObjectId;
use crate::repositories::follow_repository::{EdgeInsert, FollowRepository};
use crate::repositories::user_repository::UserRepository;
use crate::services::parse_user_id;

/// Follow-graph rules: public targets are followed immediately, private
/// targets get a pending request that the target must accept.
#[derive(Clone)]
pub struct FollowService {
    users: UserRepository,
    follows: FollowRepository,
}

impl FollowService {
    pub fn new(users: UserRepository, follows: FollowRepository) -> Self {
        Self { users, follows }
    }

    /// Creates the edge and reports the status it landed in. Two concurrent
    /// requests for the same pair race on the unique index; the loser is
    /// told the edge already exists, same as a repeat call.
    pub async fn follow_user(
        &self,
        caller: &ObjectId,
        target_raw: &str,
    ) -> Result<FollowStatus, ApiError> {
        let target_id = parse_user_id(target_raw)?;
        if &target_id == caller {
            return Err(ApiError::bad_request(
                "You cannot send a follow request to yourself",
            ));
        }
        let target = self
            .users
            .find_active_by_id(&target_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if let Some(edge) = self.follows.find(caller, &target_id).await? {
            return Err(existing_edge_error(edge.status));
        }

        let status = follow_status_for_target(target.is_private);
        let edge = Follow::new(caller.clone(), target_id.clone(), status);
        match self.follows.insert(&edge).await? {
            EdgeInsert::Created => Ok(status),
            EdgeInsert::Duplicate => {
                // Lost the race; report what the winner created.
                match self.follows.find(caller, &target_id).await? {
                    Some(edge) => Err(existing_edge_error(edge.status)),
                    None => Err(ApiError::bad_request("You have already requested this user")),
                }
            }
        }
    }

    pub async fn unfollow_user(
        &self,
        caller: &ObjectId,
        target_raw: &str,
    ) -> Result<Follow, ApiError> {
        let target_id = parse_user_id(target_raw)?;
        self.follows
            .delete_accepted(caller, &target_id)
            .await?
            .ok_or_else(|| ApiError::not_found("You are not following this user"))
    }

    /// The target of a pending request promotes it to accepted. Only private
    /// accounts hold requests; on a public account there is nothing to accept.
    pub async fn accept_request(
        &self,
        caller: &ObjectId,
        requester_raw: &str,
    ) -> Result<Follow, ApiError> {
        let account = self
            .users
            .find_active_by_id(caller)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        ensure_private_account(
            account.is_private,
            "Your account is public, request already accepted",
        )?;

        let requester_id = parse_user_id(requester_raw)?;
        let edge = self
            .follows
            .find(&requester_id, caller)
            .await?
            .ok_or_else(|| ApiError::not_found("Request not found"))?;
        if edge.status == FollowStatus::Accepted {
            return Err(ApiError::bad_request("Request already accepted"));
        }

        self.follows
            .set_accepted(&edge.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Request not found"))
    }

    pub async fn pending_requests(&self, caller: &ObjectId) -> Result<Vec<Follow>, ApiError> {
        let account = self
            .users
            .find_active_by_id(caller)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        ensure_private_account(
            account.is_private,
            "Your account is public, no such request found",
        )?;

        let requests = self.follows.pending_for(caller).await?;
        if requests.is_empty() {
            return Err(ApiError::not_found("No requests found"));
        }
        Ok(requests)
    }
}

pub(crate) fn follow_status_for_target(target_is_private: bool) -> FollowStatus {
    if target_is_private {
        FollowStatus::Pending
    } else {
        FollowStatus::Accepted
    }
}

pub(crate) fn existing_edge_error(status: FollowStatus) -> ApiError {
    match status {
        FollowStatus::Accepted => ApiError::bad_request("You are already following this user"),
        FollowStatus::Pending => ApiError::bad_request("You have already requested this user"),
    }
}

pub(crate) fn ensure_private_account(is_private: bool, message: &str) -> Result<(), ApiError> {
    if is_private {
        Ok(())
    } else {
        Err(ApiError::bad_request(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_targets_are_followed_immediately() {
        assert_eq!(follow_status_for_target(false), FollowStatus::Accepted);
    }

    #[test]
    fn private_targets_get_a_pending_request() {
        assert_eq!(follow_status_for_target(true), FollowStatus::Pending);
    }

    #[test]
    fn repeat_follow_names_the_current_edge_state() {
        match existing_edge_error(FollowStatus::Accepted) {
            ApiError::BadRequest(message) => {
                assert_eq!(message, "You are already following this user")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        match existing_edge_error(FollowStatus::Pending) {
            ApiError::BadRequest(message) => {
                assert_eq!(message, "You have already requested this user")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn request_endpoints_require_a_private_account() {
        assert!(ensure_private_account(true, "whatever").is_ok());
        match ensure_private_account(false, "Your account is public, request already accepted") {
            Err(ApiError::BadRequest(message)) => {
                assert_eq!(message, "Your account is public, request already accepted")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
