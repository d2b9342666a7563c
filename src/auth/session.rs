//! HS256 session tokens.
//!
//! A session is a JWT carried either as `Authorization: Bearer` or in the
//! `qa_session` HttpOnly cookie.

use actix_web::cookie::{Cookie, SameSite, time};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::SessionClaims;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "qa_session";
/// Session JWT issuer.
pub const SESSION_ISSUER: &str = "qa-scenario-server";

/// Issue a session token for a user. Returns the token and its expiry.
pub fn create_session_token(
    user: &user::Model,
    secret: &SecretString,
    ttl_secs: u64,
) -> AppResult<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expires_at = now + Duration::seconds(ttl_secs as i64);

    let claims = SessionClaims {
        sub: user.id.to_string(),
        iss: SESSION_ISSUER.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    };

    let key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    let token = encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AppError::Configuration(format!("Failed to create session token: {}", e)))?;

    Ok((token, expires_at))
}

/// Verify a session token and return its claims.
pub fn verify_session_token(token: &str, secret: &SecretString) -> Result<SessionClaims, String> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_aud = false;

    decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid session token: {}", e))
}

/// Build the session cookie (or an expired one to clear it when `token` is empty).
pub fn session_cookie(token: &str, ttl_secs: u64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    if token.is_empty() {
        cookie.set_max_age(time::Duration::ZERO);
    } else {
        cookie.set_max_age(time::Duration::seconds(ttl_secs as i64));
    }
    cookie
}
