pub mod follow;
pub mod object_id;
pub mod post;
pub mod user;
