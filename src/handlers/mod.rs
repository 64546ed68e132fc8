pub mod auth_handlers;
pub mod follow_handlers;
pub mod post_handlers;
pub mod user_handlers;
