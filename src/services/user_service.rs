use regex::Regex;
use std::path::PathBuf;

use crate::dtos::auth_dtos::SignupIn;
use crate::dtos::user_dtos::{UpdateUserIn, UserQuery};
use crate::errors::ApiError;
use crate::models::object_id::ObjectId;
use crate::models::user::{PublicUser, User, UserPatch, UserProfile};
use crate::repositories::user_repository::UserRepository;
use crate::services::auth_service::hash_password;
use crate::services::{page_offset, parse_user_id};
use crate::storage;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    upload_dir: PathBuf,
}

impl UserService {
    pub fn new(users: UserRepository, upload_dir: PathBuf) -> Self {
        Self { users, upload_dir }
    }

    pub async fn create_user(&self, input: SignupIn) -> Result<PublicUser, ApiError> {
        let input = validate_signup(input)?;
        if self
            .users
            .email_or_username_taken(&input.email, &input.username)
            .await?
        {
            return Err(ApiError::bad_request("Email or username already used"));
        }

        let user = User::new(
            input.first_name,
            input.last_name,
            input.email,
            input.username,
            hash_password(&input.password)?,
        );
        self.users.insert(&user).await?;
        Ok(user.into())
    }

    pub async fn get_profile(&self, id_raw: &str) -> Result<UserProfile, ApiError> {
        let id = parse_user_id(id_raw)?;
        let (user, total_followers, total_following) = self
            .users
            .profile_with_counts(&id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found!"))?;
        Ok(UserProfile {
            user: user.into(),
            total_followers,
            total_following,
        })
    }

    pub async fn get_own_profile(&self, caller: &ObjectId) -> Result<UserProfile, ApiError> {
        let (user, total_followers, total_following) = self
            .users
            .profile_with_counts(caller)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found!"))?;
        Ok(UserProfile {
            user: user.into(),
            total_followers,
            total_following,
        })
    }

    /// Name and username filters are ANDed; out-of-range paging values fall
    /// back to the defaults instead of erroring.
    pub async fn search_users(&self, query: UserQuery) -> Result<Vec<PublicUser>, ApiError> {
        let page = query
            .page_number
            .filter(|page| *page > 0)
            .unwrap_or(DEFAULT_PAGE);
        let limit = query.limit.filter(|limit| *limit > 0).unwrap_or(DEFAULT_LIMIT);
        let name = query
            .name
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());
        let username = query
            .username
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());

        let users = self
            .users
            .search(name, username, page_offset(page, limit)?, limit)
            .await?;
        if users.is_empty() {
            return Err(ApiError::not_found("User not found!"));
        }
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn update_user(
        &self,
        caller: &ObjectId,
        target_raw: &str,
        input: UpdateUserIn,
    ) -> Result<PublicUser, ApiError> {
        let target = parse_user_id(target_raw)?;
        if &target != caller {
            return Err(ApiError::unauthorized("You cannot update this profile"));
        }

        let profile_image = input
            .profile
            .as_ref()
            .map(|file| storage::save_profile_image(&self.upload_dir, caller, file))
            .transpose()?;
        let patch = UserPatch {
            first_name: input
                .first_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            last_name: input
                .last_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            bio: input.bio,
            is_private: input.is_private,
            profile_image,
        };
        if patch.is_empty() {
            return Err(ApiError::bad_request("No body found!"));
        }

        self.users
            .update(&target, &patch)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| ApiError::not_found("User not found!"))
    }

    /// Soft delete. The email is rewritten to a unique mutated value so the
    /// original address can be used for a fresh signup.
    pub async fn delete_user(&self, caller: &ObjectId, target_raw: &str) -> Result<(), ApiError> {
        let target = parse_user_id(target_raw)?;
        if &target != caller {
            return Err(ApiError::unauthorized("You cannot delete this account"));
        }

        let user = self
            .users
            .find_active_by_id(&target)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found!"))?;
        let deleted = self
            .users
            .soft_delete(&target, &mangled_email(&user.email))
            .await?;
        if !deleted {
            return Err(ApiError::not_found("User not found!"));
        }
        Ok(())
    }
}

fn validate_signup(input: SignupIn) -> Result<SignupIn, ApiError> {
    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_lowercase();

    if first_name.is_empty() || last_name.is_empty() {
        return Err(ApiError::bad_request("First and last name are required"));
    }
    if username.is_empty() {
        return Err(ApiError::bad_request("Username is required"));
    }
    if !looks_like_email(&email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if input.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    Ok(SignupIn {
        first_name,
        last_name,
        email,
        username,
        password: input.password,
    })
}

pub(crate) fn looks_like_email(email: &str) -> bool {
    let pattern = Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
    pattern.is_match(email)
}

/// Frees the unique email slot while keeping the original address readable
/// in the row; the random suffix keeps repeated signups distinct.
pub(crate) fn mangled_email(email: &str) -> String {
    format!("{email}.deleted.{}", ObjectId::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str) -> SignupIn {
        SignupIn {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            username: "ada".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(looks_like_email("kim@example.com"));
        assert!(looks_like_email("first.last+tag@sub.domain.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!looks_like_email("plainstring"));
        assert!(!looks_like_email("missing@tld"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("spaces in@example.com"));
    }

    #[test]
    fn signup_normalizes_and_validates() {
        let out = validate_signup(signup("  Kim@Example.COM ", "secret1")).unwrap();
        assert_eq!(out.email, "kim@example.com");

        assert!(validate_signup(signup("kim@example.com", "short")).is_err());
        assert!(validate_signup(signup("not-an-email", "secret1")).is_err());
    }

    #[test]
    fn mangled_emails_keep_the_original_and_stay_unique() {
        let first = mangled_email("kim@example.com");
        let second = mangled_email("kim@example.com");
        assert!(first.starts_with("kim@example.com.deleted."));
        assert_ne!(first, second);
    }
}
