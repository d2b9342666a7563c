//! Project membership endpoints.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use super::DeletedResponse;
use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::entity::{project_member, user};
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiResponse, InviteMemberRequest, MemberResponse, MemberRole, MemberUser, RemoveMemberQuery,
};
use crate::services::ProjectAccess;

fn member_user(u: &user::Model) -> MemberUser {
    MemberUser {
        id: u.id,
        name: u.name.clone(),
        email: u.email.clone(),
    }
}

fn member_response(m: project_member::Model, u: &user::Model) -> MemberResponse {
    MemberResponse {
        id: Some(m.id),
        role: MemberRole::parse(&m.role).unwrap_or(MemberRole::Member),
        is_owner: false,
        invited_at: Some(m.invited_at),
        user: member_user(u),
    }
}

/// Members of a project, owner first.
#[utoipa::path(
    get,
    path = "/projects/{id}/members",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Owner followed by members", body = Vec<MemberResponse>),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn list_members(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;

    let mut data = Vec::new();
    if let Some(owner) = pool.find_user_by_id(access.project.owner_id).await? {
        data.push(MemberResponse {
            id: None,
            role: MemberRole::Owner,
            is_owner: true,
            invited_at: None,
            user: member_user(&owner),
        });
    }
    for (membership, member) in pool.list_members(access.project.id).await? {
        if let Some(member) = member {
            data.push(member_response(membership, &member));
        }
    }

    Ok(ApiResponse::ok(data))
}

/// Invite an existing user by email; owner or admin only.
#[utoipa::path(
    post,
    path = "/projects/{id}/members",
    tag = "Members",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Member added", body = MemberResponse),
        (status = 400, description = "Invalid role", body = crate::error::ErrorResponse),
        (status = 403, description = "Owner or admin required", body = crate::error::ErrorResponse),
        (status = 404, description = "Project or user not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already the owner or a member", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn invite_member(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<InviteMemberRequest>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;
    access.require_manager()?;

    let req = body.into_inner();
    if req.role == MemberRole::Owner {
        return Err(AppError::Validation(
            "Role must be ADMIN or MEMBER".to_string(),
        ));
    }

    let invitee = pool
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    if invitee.id == access.project.owner_id {
        return Err(AppError::conflict(
            "ALREADY_OWNER",
            "This user already owns the project",
        ));
    }
    if pool
        .find_membership(access.project.id, invitee.id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(
            "ALREADY_MEMBER",
            "This user is already a member of the project",
        ));
    }

    let membership = pool
        .insert_member(access.project.id, invitee.id, req.role)
        .await?;
    info!(
        project_id = %access.project.id,
        user_id = %invitee.id,
        role = %req.role,
        "Member invited"
    );

    Ok(ApiResponse::created(member_response(membership, &invitee)))
}

/// Remove a member; owner or admin only.
#[utoipa::path(
    delete,
    path = "/projects/{id}/members",
    tag = "Members",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ("memberId" = Uuid, Query, description = "Membership ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = DeletedResponse),
        (status = 403, description = "Owner or admin required", body = crate::error::ErrorResponse),
        (status = 404, description = "Project or member not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn remove_member(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<RemoveMemberQuery>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;
    access.require_manager()?;

    let membership = pool
        .get_membership(query.member_id)
        .await?
        .filter(|m| m.project_id == access.project.id)
        .ok_or_else(|| AppError::NotFound("Member".to_string()))?;

    pool.delete_membership(membership.id).await?;
    info!(project_id = %access.project.id, user_id = %membership.user_id, "Member removed");

    Ok(ApiResponse::ok(DeletedResponse { id: membership.id }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{id}/members")
            .route(web::get().to(list_members))
            .route(web::post().to(invite_member))
            .route(web::delete().to(remove_member)),
    );
}
