use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};

use crate::dtos::follow_dtos::FollowTargetIn;
use crate::errors::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::follow::FollowStatus;
use crate::response;
use crate::services::follow_service::FollowService;

#[post("/api/users/follow")]
pub async fn follow_user(
    auth: AuthenticatedUser,
    follows: web::Data<FollowService>,
    body: web::Json<FollowTargetIn>,
) -> Result<HttpResponse, ApiError> {
    let status = follows.follow_user(&auth.user_id, &body.id).await?;
    let message = match status {
        FollowStatus::Pending => "Sent follow request successfully!",
        FollowStatus::Accepted => "Followed successfully!",
    };
    Ok(response::message_only(StatusCode::OK, message))
}

#[post("/api/users/unfollow")]
pub async fn unfollow_user(
    auth: AuthenticatedUser,
    follows: web::Data<FollowService>,
    body: web::Json<FollowTargetIn>,
) -> Result<HttpResponse, ApiError> {
    follows.unfollow_user(&auth.user_id, &body.id).await?;
    Ok(response::message_only(
        StatusCode::OK,
        "Unfollowed successfully!",
    ))
}

#[post("/api/users/accept-request")]
pub async fn accept_request(
    auth: AuthenticatedUser,
    follows: web::Data<FollowService>,
    body: web::Json<FollowTargetIn>,
) -> Result<HttpResponse, ApiError> {
    let edge = follows.accept_request(&auth.user_id, &body.id).await?;
    Ok(response::success(
        StatusCode::OK,
        "Request accepted successfully!",
        edge,
    ))
}

#[get("/api/users/get-requests")]
pub async fn get_requests(
    auth: AuthenticatedUser,
    follows: web::Data<FollowService>,
) -> Result<HttpResponse, ApiError> {
    let requests = follows.pending_requests(&auth.user_id).await?;
    Ok(response::success(
        StatusCode::OK,
        "Requests fetched successfully!",
        requests,
    ))
}
