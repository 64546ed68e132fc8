use actix_web::http::StatusCode;
use actix_web::{delete, get, patch, web, HttpResponse};

use crate::dtos::user_dtos::{UpdateUserIn, UserQuery};
use crate::errors::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::response;
use crate::services::user_service::UserService;

#[get("/api/users")]
pub async fn list_users(
    _auth: AuthenticatedUser,
    users: web::Data<UserService>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    let found = users.search_users(query.into_inner()).await?;
    let message = format!("Fetched {} users", found.len());
    Ok(response::success(StatusCode::OK, &message, found))
}

#[get("/api/users/profile")]
pub async fn get_own_profile(
    auth: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, ApiError> {
    let profile = users.get_own_profile(&auth.user_id).await?;
    Ok(response::success(
        StatusCode::OK,
        "Profile fetched successfully!",
        profile,
    ))
}

#[get("/api/users/profile/{id}")]
pub async fn get_user_profile(
    _auth: AuthenticatedUser,
    users: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let profile = users.get_profile(&path.into_inner()).await?;
    Ok(response::success(
        StatusCode::OK,
        "User fetched successfully!",
        profile,
    ))
}

#[patch("/api/users/{id}")]
pub async fn update_user(
    auth: AuthenticatedUser,
    users: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<UpdateUserIn>,
) -> Result<HttpResponse, ApiError> {
    let user = users
        .update_user(&auth.user_id, &path.into_inner(), body.into_inner())
        .await?;
    Ok(response::success(
        StatusCode::OK,
        "Your profile updated successfully!",
        user,
    ))
}

#[delete("/api/users/{id}")]
pub async fn delete_user(
    auth: AuthenticatedUser,
    users: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    users.delete_user(&auth.user_id, &path.into_inner()).await?;
    Ok(response::message_only(
        StatusCode::OK,
        "Account deleted successfully!",
    ))
}
