mod config;
mod dtos;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod response;
mod services;
mod storage;

use std::env;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use log::{error, info};

use crate::errors::ApiError;
use crate::handlers::auth_handlers::{refresh_token, signin, signup};
use crate::handlers::follow_handlers::{accept_request, follow_user, get_requests, unfollow_user};
use crate::handlers::post_handlers::{create_post, delete_post, get_feed, get_post, update_post};
use crate::handlers::user_handlers::{
    delete_user, get_own_profile, get_user_profile, list_users, update_user,
};
use crate::repositories::follow_repository::FollowRepository;
use crate::repositories::post_repository::PostRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::auth_service::AuthService;
use crate::services::follow_service::FollowService;
use crate::services::post_service::PostService;
use crate::services::user_service::UserService;

async fn endpoint_not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found("This endpoint not found"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let pg_pool = match config::get_pg_pool() {
        Ok(pool) => pool,
        Err(err) => {
            error!("Failed to create PG pool: {}", err);
            std::process::exit(1);
        }
    };

    let users = UserRepository::new(pg_pool.clone());
    let follows = FollowRepository::new(pg_pool.clone());
    let posts = PostRepository::new(pg_pool);
    let upload_dir = config::upload_dir();

    let auth_service = web::Data::new(AuthService::new(users.clone()));
    let user_service = web::Data::new(UserService::new(users.clone(), upload_dir.clone()));
    let follow_service = web::Data::new(FollowService::new(users, follows.clone()));
    let post_service = web::Data::new(PostService::new(posts, follows, upload_dir));

    let allowed_origins =
        env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into());

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec!["authorization", "content-type", "accept"])
            .max_age(3600);
        for origin in allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(auth_service.clone())
            .app_data(user_service.clone())
            .app_data(follow_service.clone())
            .app_data(post_service.clone())
            .service(signup)
            .service(signin)
            .service(refresh_token)
            // Fixed-path user routes go before the {id} matchers.
            .service(get_own_profile)
            .service(get_user_profile)
            .service(follow_user)
            .service(unfollow_user)
            .service(accept_request)
            .service(get_requests)
            .service(list_users)
            .service(update_user)
            .service(delete_user)
            .service(create_post)
            .service(get_feed)
            .service(get_post)
            .service(update_post)
            .service(delete_post)
            .default_service(web::route().to(endpoint_not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}
