//! Actix-web extractor for session authentication.

use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::future::{Ready, ready};
use uuid::Uuid;

use super::session::{SESSION_COOKIE, verify_session_token};
use crate::config::Config;
use crate::error::ErrorResponse;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED)
            .json(ErrorResponse::new("UNAUTHORIZED", self.message.clone()))
    }
}

/// Extractor that requires a valid session.
///
/// ```ignore
/// async fn protected_handler(auth: SessionAuth) -> impl Responder {
///     // auth.user_id is the signed-in user
/// }
/// ```
///
/// The token is read from `Authorization: Bearer <jwt>` first, then from
/// the session cookie. The user row is not re-read; handlers that need it
/// look it up themselves.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

impl FromRequest for SessionAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let config = match req.app_data::<web::Data<Config>>() {
            Some(config) => config,
            None => {
                return ready(Err(AuthError {
                    message: "Internal configuration error".to_string(),
                }));
            }
        };

        let token = bearer_token(req).or_else(|| {
            req.cookie(SESSION_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        });

        let Some(token) = token else {
            return ready(Err(AuthError {
                message: "Authentication required".to_string(),
            }));
        };

        match verify_session_token(&token, &config.session.secret) {
            Ok(claims) => ready(Ok(SessionAuth {
                user_id: claims.user_id,
                email: claims.email,
                name: claims.name,
            })),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                ready(Err(AuthError {
                    message: "Invalid or expired session".to_string(),
                }))
            }
        }
    }
}
