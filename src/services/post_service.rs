use std::path::PathBuf;

use crate::dtos::post_dtos::{CreatePostIn, FeedPage, FeedQuery, UpdatePostIn};
use crate::errors::ApiError;
use crate::models::follow::FollowStatus;
use crate::models::object_id::ObjectId;
use crate::models::post::{Post, PostPatch, PostWithAuthor};
use crate::repositories::follow_repository::FollowRepository;
use crate::repositories::post_repository::{PostRepository, SortOrder};
use crate::services::{page_offset, parse_post_id};
use crate::storage;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct PostService {
    posts: PostRepository,
    follows: FollowRepository,
    upload_dir: PathBuf,
}

impl PostService {
    pub fn new(posts: PostRepository, follows: FollowRepository, upload_dir: PathBuf) -> Self {
        Self {
            posts,
            follows,
            upload_dir,
        }
    }

    /// The row is inserted first so the image directory can be keyed by the
    /// post id, then patched with the stored paths.
    pub async fn create_post(
        &self,
        caller: &ObjectId,
        input: CreatePostIn,
    ) -> Result<Post, ApiError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::bad_request("Title is required"));
        }

        let post = Post::new(
            caller.clone(),
            title,
            input.description.unwrap_or_default(),
        );
        self.posts.insert(&post).await?;

        if input.images.is_empty() {
            return Ok(post);
        }
        let stored = storage::save_post_images(&self.upload_dir, caller, &post.id, &input.images)?;
        self.posts
            .set_images(&post.id, &stored)
            .await?
            .ok_or_else(|| ApiError::Internal("post vanished while storing images".to_string()))
    }

    pub async fn get_post(
        &self,
        caller: &ObjectId,
        id_raw: &str,
    ) -> Result<PostWithAuthor, ApiError> {
        let id = parse_post_id(id_raw)?;
        let post = self
            .posts
            .find_with_author(&id)
            .await?
            .ok_or_else(post_not_found)?;

        let edge = if &post.posted_by.id == caller {
            None
        } else {
            self.follows
                .find(caller, &post.posted_by.id)
                .await?
                .map(|edge| edge.status)
        };
        if !can_view(caller, &post.posted_by.id, edge) {
            return Err(post_not_found());
        }
        Ok(post)
    }

    pub async fn feed(&self, caller: &ObjectId, query: FeedQuery) -> Result<FeedPage, ApiError> {
        let (page, limit) = validate_paging(query.page_number, query.limit)?;
        let offset = page_offset(page, limit)?;
        let order = sort_order(query.sort.as_deref());
        let search = query
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());

        let (posts, total_post) = self
            .posts
            .feed(caller, search, order, offset, limit)
            .await?;
        if posts.is_empty() {
            return Err(ApiError::not_found("Posts not found!"));
        }
        Ok(FeedPage { posts, total_post })
    }

    pub async fn update_post(
        &self,
        caller: &ObjectId,
        id_raw: &str,
        input: UpdatePostIn,
    ) -> Result<Post, ApiError> {
        let id = parse_post_id(id_raw)?;
        let post = self.posts.find_by_id(&id).await?.ok_or_else(post_not_found)?;
        if &post.posted_by != caller {
            return Err(ApiError::unauthorized("You cannot update this post"));
        }

        let images = match &input.images {
            Some(files) if !files.is_empty() => {
                Some(storage::save_post_images(&self.upload_dir, caller, &id, files)?)
            }
            _ => None,
        };
        let patch = PostPatch {
            title: input
                .title
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty()),
            description: input.description,
            images,
        };
        if patch.is_empty() {
            return Err(ApiError::bad_request("No body found!"));
        }

        self.posts.update(&id, &patch).await?.ok_or_else(post_not_found)
    }

    pub async fn delete_post(&self, caller: &ObjectId, id_raw: &str) -> Result<Post, ApiError> {
        let id = parse_post_id(id_raw)?;
        let post = self.posts.find_by_id(&id).await?.ok_or_else(post_not_found)?;
        if &post.posted_by != caller {
            return Err(ApiError::unauthorized("You cannot delete this post"));
        }

        storage::remove_post_dir(&self.upload_dir, caller, &id)?;
        self.posts.delete(&id).await?;
        Ok(post)
    }
}

/// A post is visible to its author and to viewers holding an accepted edge
/// toward the author. Denials surface as "Post not found!" so a hidden post
/// is indistinguishable from a missing one.
pub(crate) fn can_view(
    viewer: &ObjectId,
    author: &ObjectId,
    edge: Option<FollowStatus>,
) -> bool {
    viewer == author || edge == Some(FollowStatus::Accepted)
}

fn post_not_found() -> ApiError {
    ApiError::not_found("Post not found!")
}

pub(crate) fn validate_paging(
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<(i64, i64), ApiError> {
    if limit == Some(0) {
        return Err(ApiError::bad_request("Limit cannot be 0"));
    }
    if page == Some(0) {
        return Err(ApiError::bad_request("Page number cannot be 0"));
    }
    Ok((
        page.unwrap_or(DEFAULT_PAGE).max(1),
        limit.unwrap_or(DEFAULT_LIMIT).max(1),
    ))
}

pub(crate) fn sort_order(sort: Option<&str>) -> SortOrder {
    match sort {
        Some("dec") => SortOrder::Desc,
        _ => SortOrder::Asc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authors_always_see_their_own_posts() {
        let author = ObjectId::new();
        assert!(can_view(&author, &author, None));
    }

    #[test]
    fn accepted_followers_see_the_post() {
        let viewer = ObjectId::new();
        let author = ObjectId::new();
        assert!(can_view(&viewer, &author, Some(FollowStatus::Accepted)));
    }

    #[test]
    fn pending_and_absent_edges_deny_access() {
        let viewer = ObjectId::new();
        let author = ObjectId::new();
        assert!(!can_view(&viewer, &author, Some(FollowStatus::Pending)));
        assert!(!can_view(&viewer, &author, None));
    }

    #[test]
    fn paging_defaults_apply_when_unset() {
        assert_eq!(validate_paging(None, None).unwrap(), (1, 10));
        assert_eq!(validate_paging(Some(3), Some(25)).unwrap(), (3, 25));
    }

    #[test]
    fn zero_page_and_zero_limit_are_rejected() {
        assert!(matches!(
            validate_paging(Some(0), None),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            validate_paging(None, Some(0)),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn negative_paging_clamps_to_one() {
        assert_eq!(validate_paging(Some(-2), Some(-5)).unwrap(), (1, 1));
    }

    #[test]
    fn oversized_page_numbers_are_rejected_not_wrapped() {
        let (page, limit) = validate_paging(Some(i64::MAX), Some(10)).unwrap();
        assert!(matches!(
            page_offset(page, limit),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn only_dec_sorts_descending() {
        assert_eq!(sort_order(Some("dec")), SortOrder::Desc);
        assert_eq!(sort_order(Some("desc")), SortOrder::Asc);
        assert_eq!(sort_order(None), SortOrder::Asc);
    }
}
