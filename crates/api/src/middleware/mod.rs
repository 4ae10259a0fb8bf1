//! Request extractors for identity ([`auth`]) and role checks ([`rbac`]).

pub mod auth;
pub mod rbac;
