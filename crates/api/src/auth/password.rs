//! Argon2id password hashes, stored as PHC strings.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

fn hasher() -> Argon2<'static> {
    Argon2::default()
}

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// `Ok(false)` on a mismatch; `Err` only when `hash` is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(hash)?;
    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check a login attempt against the stored hash of the named account, if any.
///
/// An unknown account still pays for one verification against a throwaway
/// hash, so both failure paths take about the same time.
pub fn verify_login(password: &str, stored: Option<&str>) -> Result<bool, Error> {
    match stored {
        Some(hash) => verify_password(password, hash),
        None => {
            if let Some(hash) = placeholder_hash() {
                let _ = verify_password(password, hash);
            }
            Ok(false)
        }
    }
}

fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash_password("no-such-account").ok())
        .as_deref()
}
