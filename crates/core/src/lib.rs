//! Domain types and rules for the musicrev backend.
//!
//! Nothing in this crate performs I/O; the database and HTTP layers build on
//! these types.

pub mod error;
pub mod media;
pub mod moderation;
pub mod permissions;
pub mod profile;
pub mod roles;
pub mod search;
pub mod types;
pub mod validation;
