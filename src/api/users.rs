//! User directory, used to pick assignees and invitees.

use actix_web::{HttpResponse, web};

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{ApiResponse, UserSummary};

/// List all users by name.
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Users ordered by name", body = Vec<UserSummary>),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn list_users(_auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let users = pool.list_users().await?;
    let data: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();
    Ok(ApiResponse::ok(data))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::get().to(list_users)));
}
