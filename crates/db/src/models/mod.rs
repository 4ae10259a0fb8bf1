//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response struct with the owning user's profile embedded
//! - `Deserialize` create/update DTOs and list query parameters

pub mod comment;
pub mod like;
pub mod report;
pub mod track;
pub mod user;
