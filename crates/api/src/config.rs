//! Process configuration, read once from the environment at startup.
//!
//! | Variable               | Default                 |
//! |------------------------|-------------------------|
//! | `HOST`                 | `0.0.0.0`               |
//! | `PORT`                 | `3000`                  |
//! | `CORS_ORIGINS`         | `http://localhost:5173` |
//! | `REQUEST_TIMEOUT_SECS` | `30`                    |
//! | `MEDIA_ROOT`           | `media`                 |
//! | `MAX_UPLOAD_BYTES`     | 50 MiB                  |
//! | `JWT_SECRET`           | required                |
//! | `JWT_ACCESS_EXPIRY_MINS` | `60`                  |
//!
//! Setting all of `ADMIN_USERNAME`, `ADMIN_EMAIL` and `ADMIN_PASSWORD`
//! provisions an administrator on boot.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Root directory for uploaded audio.
    pub media_root: PathBuf,
    /// Body size cap, applied to every route but sized for uploads.
    pub max_upload_bytes: usize,
    pub bootstrap_admin: Option<AdminBootstrap>,
}

#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AdminBootstrap {
    fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v: &String| !v.is_empty());
        Some(Self {
            username: var("ADMIN_USERNAME")?,
            email: var("ADMIN_EMAIL")?,
            password: var("ADMIN_PASSWORD")?,
        })
    }
}

impl ServerConfig {
    /// # Panics
    ///
    /// On a value that does not parse, or a missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        Self {
            host: setting("HOST", "0.0.0.0".to_string()),
            port: setting("PORT", 3000),
            cors_origins: split_origins(&setting(
                "CORS_ORIGINS",
                "http://localhost:5173".to_string(),
            )),
            request_timeout_secs: setting("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            media_root: setting("MEDIA_ROOT", PathBuf::from("media")),
            max_upload_bytes: setting("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            bootstrap_admin: AdminBootstrap::from_env(),
        }
    }
}

fn setting<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    parse_setting(name, std::env::var(name).ok(), default)
}

fn parse_setting<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => default,
        Some(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name}={raw:?} is invalid: {e}")),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
