use actix_web::http::StatusCode;
use actix_web::{post, web, HttpResponse};

use crate::dtos::auth_dtos::{RefreshIn, SigninIn, SignupIn};
use crate::errors::ApiError;
use crate::response;
use crate::services::auth_service::AuthService;
use crate::services::user_service::UserService;

#[post("/api/auth/signup")]
pub async fn signup(
    users: web::Data<UserService>,
    body: web::Json<SignupIn>,
) -> Result<HttpResponse, ApiError> {
    let user = users.create_user(body.into_inner()).await?;
    Ok(response::success(
        StatusCode::CREATED,
        "User created successfully!",
        user,
    ))
}

#[post("/api/auth/signin")]
pub async fn signin(
    auth: web::Data<AuthService>,
    body: web::Json<SigninIn>,
) -> Result<HttpResponse, ApiError> {
    let tokens = auth.authenticate(&body.email, &body.password).await?;
    Ok(response::success(
        StatusCode::OK,
        "Authenticated successfully!",
        tokens,
    ))
}

#[post("/api/auth/refresh-token")]
pub async fn refresh_token(
    auth: web::Data<AuthService>,
    body: web::Json<RefreshIn>,
) -> Result<HttpResponse, ApiError> {
    let token = body
        .into_inner()
        .refresh_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::not_found("No token found"))?;
    let tokens = auth.refresh(&token)?;
    Ok(response::success(
        StatusCode::CREATED,
        "Tokens generated successfully!",
        tokens,
    ))
}
