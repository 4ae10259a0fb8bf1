pub mod auth;
pub mod comments;
pub mod likes;
pub mod reports;
pub mod tracks;
pub mod users;
