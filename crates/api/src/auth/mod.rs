//! Credentials: [`password`] hashing and [`jwt`] bearer tokens.

pub mod jwt;
pub mod password;
