use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::config;
use crate::errors::ApiError;
use crate::models::object_id::ObjectId;
use crate::services::auth_service;

/// Identity extracted from the `Authorization: Bearer <token>` header.
/// Handlers take this as an argument to mark a route as protected.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    let claims = auth_service::decode_token(token, &config::access_secret())?;
    let user_id =
        ObjectId::parse(&claims.id).ok_or_else(|| ApiError::unauthorized("Invalid token"))?;
    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    use crate::services::auth_service::generate_tokens;

    #[test]
    fn extracts_identity_from_a_bearer_token() {
        let user_id = ObjectId::new();
        let pair = generate_tokens(&user_id, "kim@example.com").unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_http_request();

        let user = authenticate(&req).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "kim@example.com");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            authenticate(&req),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn non_bearer_schemes_are_rejected() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(authenticate(&req).is_err());
    }

    #[test]
    fn refresh_tokens_do_not_pass_as_access_tokens() {
        let pair = generate_tokens(&ObjectId::new(), "kim@example.com").unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", pair.refresh_token)))
            .to_http_request();
        assert!(authenticate(&req).is_err());
    }
}
