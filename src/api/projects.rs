//! Project endpoints.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::DeletedResponse;
use super::scenarios::scenario_responses;
use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    ApiResponse, CreateProjectRequest, MemberRole, ProjectDetail, ProjectSummary,
    UpdateProjectRequest, UserSummary,
};
use crate::services::ProjectAccess;
use crate::services::export::{export_filename, render_markdown};

/// Assemble the detail view: scenarios with steps and assignees, owner, run count.
async fn project_detail(pool: &DbPool, access: ProjectAccess) -> AppResult<ProjectDetail> {
    let ProjectAccess { project, role } = access;

    let scenarios = pool.list_scenarios(project.id).await?;
    let scenarios = scenario_responses(pool, scenarios).await?;
    let owner = pool
        .find_user_by_id(project.owner_id)
        .await?
        .as_ref()
        .map(UserSummary::from);
    let test_run_count = pool.count_test_runs(project.id).await?;

    Ok(ProjectDetail::new(
        project,
        owner,
        role,
        scenarios,
        test_run_count,
    ))
}

/// Projects the caller owns or belongs to.
#[utoipa::path(
    get,
    path = "/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Accessible projects, most recently updated first", body = Vec<ProjectSummary>),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn list_projects(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let projects = pool.list_projects_for_user(auth.user_id).await?;

    let ids: Vec<Uuid> = projects.iter().map(|(p, _)| p.id).collect();
    let scenario_counts = pool.count_scenarios_by_project(&ids).await?;
    let run_counts = pool.count_test_runs_by_project(&ids).await?;

    let data: Vec<ProjectSummary> = projects
        .into_iter()
        .map(|(project, role)| {
            let scenarios = scenario_counts.get(&project.id).copied().unwrap_or(0);
            let runs = run_counts.get(&project.id).copied().unwrap_or(0);
            ProjectSummary::new(project, role, scenarios, runs)
        })
        .collect();

    Ok(ApiResponse::ok(data))
}

/// Create a project owned by the caller.
#[utoipa::path(
    post,
    path = "/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectDetail),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn create_project(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let new_project = body.into_inner().validate()?;
    let project = pool.insert_project(auth.user_id, new_project).await?;
    info!(project_id = %project.id, owner_id = %auth.user_id, "Project created");

    let detail = project_detail(
        &pool,
        ProjectAccess {
            project,
            role: MemberRole::Owner,
        },
    )
    .await?;
    Ok(ApiResponse::created(detail))
}

/// Project detail with scenarios and test cases.
#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetail),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn get_project(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;
    Ok(ApiResponse::ok(project_detail(&pool, access).await?))
}

/// Partial update; owner or admin only.
#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectDetail),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Owner or admin required", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn update_project(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProjectRequest>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;
    access.require_manager()?;
    let changes = body.into_inner().validate()?;

    let role = access.role;
    let project = pool.update_project(access.project, changes).await?;
    info!(project_id = %project.id, "Project updated");

    let detail = project_detail(&pool, ProjectAccess { project, role }).await?;
    Ok(ApiResponse::ok(detail))
}

/// Delete a project and everything in it; owner only.
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = DeletedResponse),
        (status = 403, description = "Owner required", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn delete_project(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;
    access.require_owner()?;

    pool.delete_project(access.project.id).await?;
    info!(project_id = %access.project.id, "Project deleted");
    Ok(ApiResponse::ok(DeletedResponse {
        id: access.project.id,
    }))
}

/// Download the project as a markdown report.
#[utoipa::path(
    get,
    path = "/projects/{id}/export",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Markdown attachment", body = String, content_type = "text/markdown"),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn export_project(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;
    let project = access.project;

    let scenarios = pool.list_scenarios(project.id).await?;
    let ids: Vec<Uuid> = scenarios.iter().map(|s| s.id).collect();
    let mut cases = pool.test_cases_by_scenario(&ids).await?;
    let scenarios: Vec<_> = scenarios
        .into_iter()
        .map(|s| {
            let steps = cases.remove(&s.id).unwrap_or_default();
            (s, steps)
        })
        .collect();

    let now = Utc::now();
    let markdown = render_markdown(&project, &scenarios, now);
    let filename = export_filename(&project.title, now.date_naive());

    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", urlencoding::encode(&filename)),
        ))
        .body(markdown))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(list_projects))
            .route(web::post().to(create_project)),
    )
    .service(
        web::resource("/projects/{id}")
            .route(web::get().to(get_project))
            .route(web::put().to(update_project))
            .route(web::delete().to(delete_project)),
    )
    .service(web::resource("/projects/{id}/export").route(web::get().to(export_project)));
}
