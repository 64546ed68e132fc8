use actix_web::http::StatusCode;
use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::dtos::post_dtos::{CreatePostIn, FeedQuery, UpdatePostIn};
use crate::errors::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::response;
use crate::services::post_service::PostService;

#[post("/api/posts")]
pub async fn create_post(
    auth: AuthenticatedUser,
    posts: web::Data<PostService>,
    body: web::Json<CreatePostIn>,
) -> Result<HttpResponse, ApiError> {
    let post = posts.create_post(&auth.user_id, body.into_inner()).await?;
    Ok(response::success(
        StatusCode::CREATED,
        "Post created successfully!",
        post,
    ))
}

#[get("/api/posts")]
pub async fn get_feed(
    auth: AuthenticatedUser,
    posts: web::Data<PostService>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = posts.feed(&auth.user_id, query.into_inner()).await?;
    Ok(response::success(
        StatusCode::OK,
        "Posts fetched successfully!",
        page,
    ))
}

#[get("/api/posts/{id}")]
pub async fn get_post(
    auth: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let post = posts.get_post(&auth.user_id, &path.into_inner()).await?;
    Ok(response::success(
        StatusCode::OK,
        "Post fetched successfully!",
        post,
    ))
}

#[patch("/api/posts/{id}")]
pub async fn update_post(
    auth: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<String>,
    body: web::Json<UpdatePostIn>,
) -> Result<HttpResponse, ApiError> {
    let post = posts
        .update_post(&auth.user_id, &path.into_inner(), body.into_inner())
        .await?;
    Ok(response::success(
        StatusCode::OK,
        "Post updated successfully!",
        post,
    ))
}

#[delete("/api/posts/{id}")]
pub async fn delete_post(
    auth: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    posts.delete_post(&auth.user_id, &path.into_inner()).await?;
    Ok(response::message_only(
        StatusCode::OK,
        "Post deleted successfully!",
    ))
}
