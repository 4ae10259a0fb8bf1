//! HTTP layer of the musicrev backend: routing, extractors, handlers.
//!
//! The binary in `main.rs` is a thin wrapper; tests build the same router
//! through [`router::build_app_router`].

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod expand;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
