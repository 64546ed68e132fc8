use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::errors::ApiError;
use crate::models::object_id::ObjectId;
use crate::repositories::user_repository::UserRepository;

const ACCESS_TOKEN_HOURS: i64 = 2;
const REFRESH_TOKEN_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
}

impl AuthService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Credential check and token issue. Unknown email and wrong password
    /// produce the same error so the response does not confirm which emails
    /// have accounts.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::bad_request("Email and password required"));
        }

        let user = self
            .users
            .find_active_by_email(&email)
            .await?
            .filter(|user| verify_password(password, &user.password))
            .ok_or_else(|| ApiError::bad_request("Invalid email or password"))?;

        generate_tokens(&user.id, &user.email)
    }

    /// Exchanges a valid refresh token for a fresh pair.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let claims = decode_token(refresh_token, &config::refresh_secret())?;
        let user_id =
            ObjectId::parse(&claims.id).ok_or_else(|| ApiError::unauthorized("Invalid token"))?;
        generate_tokens(&user_id, &claims.email)
    }
}

pub fn generate_tokens(user_id: &ObjectId, email: &str) -> Result<TokenPair, ApiError> {
    Ok(TokenPair {
        access_token: sign_token(user_id, email, &config::access_secret(), ACCESS_TOKEN_HOURS)?,
        refresh_token: sign_token(user_id, email, &config::refresh_secret(), REFRESH_TOKEN_HOURS)?,
    })
}

fn sign_token(
    user_id: &ObjectId,
    email: &str,
    secret: &str,
    hours: i64,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = TokenClaims {
        id: user_id.as_str().to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| ApiError::Internal(format!("token signing failed: {err}")))
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims, ApiError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => {
            ApiError::unauthorized("Session expired, please sign in again")
        }
        _ => ApiError::unauthorized("Invalid token"),
    })
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Internal(format!("password hashing failed: {err}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("hunter42").unwrap();
        assert_ne!(hash, "hunter42");
        assert!(verify_password("hunter42", &hash));
        assert!(!verify_password("hunter43", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hashes() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn tokens_carry_the_identity_claims() {
        let user_id = ObjectId::new();
        let pair = generate_tokens(&user_id, "kim@example.com").unwrap();

        let claims = decode_token(&pair.access_token, &config::access_secret()).unwrap();
        assert_eq!(claims.id, user_id.as_str());
        assert_eq!(claims.email, "kim@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn access_and_refresh_tokens_use_separate_secrets() {
        let pair = generate_tokens(&ObjectId::new(), "kim@example.com").unwrap();
        assert!(decode_token(&pair.access_token, &config::refresh_secret()).is_err());
        assert!(decode_token(&pair.refresh_token, &config::refresh_secret()).is_ok());
    }

    #[test]
    fn expired_tokens_report_the_expiry() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            id: ObjectId::new().as_str().to_string(),
            email: "old@example.com".to_string(),
            iat: now - 7200,
            exp: now - 120,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config::access_secret().as_bytes()),
        )
        .unwrap();

        let err = decode_token(&token, &config::access_secret()).unwrap_err();
        match err {
            ApiError::Unauthorized(message) => {
                assert_eq!(message, "Session expired, please sign in again")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
