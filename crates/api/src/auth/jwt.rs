//! Bearer access tokens.
//!
//! Tokens are HS256 JWTs over [`Claims`]. There are no refresh tokens; a
//! client logs in again once `exp` passes. Deactivating the account also
//! ends a token early (checked in `middleware::auth`).

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use musicrev_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// Role at issue time. Requests use the role stored on the account.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 60).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or an expiry that is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .unwrap_or_else(|_| panic!("JWT_ACCESS_EXPIRY_MINS is not an integer: {raw}")),
            Err(_) => DEFAULT_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

/// A signed token together with its lifetime.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Sign a token for `user_id` carrying `role`.
pub fn issue_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<AccessToken, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let expires_in = config.ttl_secs();
    let claims = Claims {
        sub: user_id,
        role: role.to_owned(),
        exp: iat + expires_in,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(AccessToken { token, expires_in })
}

/// Check the signature and expiry of `token` and return its claims.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_decodes_to_its_subject() {
        let config = config("listening-room");
        let issued = issue_access_token(7, "user", &config).unwrap();
        assert_eq!(issued.expires_in, 900);

        let claims = decode_access_token(&issued.token, &config).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn every_token_gets_its_own_jti() {
        let config = config("listening-room");
        let a = issue_access_token(1, "admin", &config).unwrap();
        let b = issue_access_token(1, "admin", &config).unwrap();
        let a = decode_access_token(&a.token, &config).unwrap();
        let b = decode_access_token(&b.token, &config).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: 3,
                role: "user".into(),
                exp: now - 5,
                iat: now - 905,
                jti: Uuid::new_v4().to_string(),
            },
            "listening-room",
        );
        assert!(decode_access_token(&token, &config("listening-room")).is_err());
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let issued = issue_access_token(3, "user", &config("studio-a")).unwrap();
        assert!(decode_access_token(&issued.token, &config("studio-b")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_access_token("not.a.jwt", &config("studio-a")).is_err());
    }
}
