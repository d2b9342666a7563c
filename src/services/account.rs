//! Email/password accounts and session endpoints.
//!
//! Flow:
//! 1. POST /auth/register: create an account in the allowed email domain
//! 2. POST /auth/login: verify the password, issue a session JWT in the
//!    response body and the `qa_session` HttpOnly cookie
//! 3. GET /auth/me: resolve the session to the current user
//! 4. POST /auth/logout: clear the cookie

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::SessionAuth;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{create_session_token, session_cookie};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, LoginRequest, LoginResponse, RegisterRequest, UserResponse};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Configure account routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(me);
}

#[derive(Serialize, ToSchema)]
pub struct LogoutResponse {
    message: &'static str,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input or email domain", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse),
    )
)]
#[post("/auth/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    if !config.is_allowed_email(&email) {
        return Err(AppError::InvalidEmailDomain(
            config.allowed_email_domain.clone(),
        ));
    }

    if pool.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::conflict(
            "USER_EXISTS",
            "An account with this email already exists",
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let user = pool
        .insert_user(&email, req.name.trim(), &password_hash)
        .await?;

    info!(user_id = %user.id, "Account registered");
    Ok(ApiResponse::created(UserResponse::from(user)))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
    )
)]
#[post("/auth/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let Some(user) = pool.find_user_by_email(&req.email).await? else {
        warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&req.password, &user.password_hash) {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let (token, expires_at) =
        create_session_token(&user, &config.session.secret, config.session.ttl_secs)?;
    let cookie = session_cookie(
        &token,
        config.session.ttl_secs,
        config.environment.is_production(),
    );

    info!(user_id = %user.id, "User logged in");
    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::new(LoginResponse {
        token,
        expires_at,
        user: UserResponse::from(user),
    })))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
    )
)]
#[post("/auth/logout")]
pub async fn logout(config: web::Data<Config>) -> HttpResponse {
    let cookie = session_cookie("", 0, config.environment.is_production());
    HttpResponse::Ok().cookie(cookie).json(ApiResponse::new(LogoutResponse {
        message: "Logged out",
    }))
}

/// Current user.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Signed-in user", body = UserResponse),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
#[get("/auth/me")]
pub async fn me(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let user = pool
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}
