//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod like_repo;
pub mod report_repo;
pub mod track_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use like_repo::LikeRepo;
pub use report_repo::ReportRepo;
pub use track_repo::{TrackFilter, TrackRepo};
pub use user_repo::UserRepo;
