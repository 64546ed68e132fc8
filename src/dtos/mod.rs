pub mod auth_dtos;
pub mod follow_dtos;
pub mod post_dtos;
pub mod user_dtos;
