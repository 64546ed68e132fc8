pub mod auth_service;
pub mod follow_service;
pub mod post_service;
pub mod user_service;

use crate::errors::ApiError;
use crate::models::object_id::ObjectId;

pub(crate) fn parse_user_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid user id"))
}

pub(crate) fn parse_post_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid post id"))
}

/// Converts a 1-based page into a row offset. Page and limit are caller
/// supplied, so the arithmetic must not wrap; an unrepresentable offset is
/// a bad request, not a store error.
pub(crate) fn page_offset(page: i64, limit: i64) -> Result<i64, ApiError> {
    page.checked_sub(1)
        .and_then(|page| page.checked_mul(limit))
        .ok_or_else(|| ApiError::bad_request("Page number out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_ids() {
        assert!(parse_user_id("not-an-id").is_err());
        assert!(parse_post_id("0123456789abcdef01234567").is_ok());
    }

    #[test]
    fn offsets_are_checked_not_wrapped() {
        assert_eq!(page_offset(1, 10).unwrap(), 0);
        assert_eq!(page_offset(3, 10).unwrap(), 20);
        assert!(page_offset(i64::MAX, 10).is_err());
        assert!(page_offset(3, i64::MAX).is_err());
    }
}
