//! Test run endpoints.
//!
//! A run snapshots the project's scenarios at creation time as NOT_RUN
//! results; results are tracked independently of the scenarios' own status.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use super::DeletedResponse;
use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::entity::test_run;
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiResponse, CreateTestRunRequest, ListTestRunsQuery, RunResultResponse, RunStats,
    TestRunDetail, TestRunSummary, UpdateRunResultRequest, non_blank,
};
use crate::services::ProjectAccess;

/// Load a run and the caller's access to its project.
async fn load_run(
    pool: &DbPool,
    run_id: Uuid,
    user_id: Uuid,
) -> AppResult<(test_run::Model, ProjectAccess)> {
    let run = pool
        .get_test_run(run_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test run".to_string()))?;
    let access = ProjectAccess::load(pool, run.project_id, user_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Test run".to_string()),
            other => other,
        })?;
    Ok((run, access))
}

/// Runs of a project, newest first, with result stats.
#[utoipa::path(
    get,
    path = "/test-runs",
    tag = "Test Runs",
    params(("projectId" = Uuid, Query, description = "Project ID")),
    responses(
        (status = 200, description = "Test runs", body = Vec<TestRunSummary>),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn list_test_runs(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListTestRunsQuery>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, query.project_id, auth.user_id).await?;

    let runs = pool.list_test_runs(access.project.id).await?;
    let ids: Vec<Uuid> = runs.iter().map(|r| r.id).collect();
    let statuses = pool.run_statuses(&ids).await?;

    let data: Vec<TestRunSummary> = runs
        .into_iter()
        .map(|run| {
            let stats = statuses
                .get(&run.id)
                .map(|s| RunStats::from_statuses(s.iter().map(String::as_str)))
                .unwrap_or_default();
            TestRunSummary::new(run, stats)
        })
        .collect();

    Ok(ApiResponse::ok(data))
}

/// Start a run covering every current scenario of the project.
#[utoipa::path(
    post,
    path = "/test-runs",
    tag = "Test Runs",
    request_body = CreateTestRunRequest,
    responses(
        (status = 201, description = "Test run created", body = TestRunDetail),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn create_test_run(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestRunRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;
    let access = ProjectAccess::load(&pool, req.project_id, auth.user_id).await?;

    let (run, results) = pool
        .create_test_run(
            access.project.id,
            req.name.trim(),
            req.app_version.trim(),
            req.environment,
        )
        .await?;
    info!(
        run_id = %run.id,
        project_id = %access.project.id,
        results = results.len(),
        "Test run created"
    );

    let stats = RunStats::from_statuses(results.iter().map(|r| r.status.as_str()));
    Ok(ApiResponse::created(TestRunDetail {
        run: TestRunSummary::new(run, stats),
        project_title: access.project.title,
        results: results
            .into_iter()
            .map(|r| RunResultResponse::new(r, None))
            .collect(),
    }))
}

/// Run detail with every result and its scenario.
#[utoipa::path(
    get,
    path = "/test-runs/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Test run ID")),
    responses(
        (status = 200, description = "Test run detail", body = TestRunDetail),
        (status = 404, description = "Test run not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn get_test_run(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (run, access) = load_run(&pool, path.into_inner(), auth.user_id).await?;

    let results = pool.list_run_results(run.id).await?;
    let stats = RunStats::from_statuses(results.iter().map(|(r, _)| r.status.as_str()));

    Ok(ApiResponse::ok(TestRunDetail {
        run: TestRunSummary::new(run, stats),
        project_title: access.project.title,
        results: results
            .into_iter()
            .map(|(result, scenario)| RunResultResponse::new(result, scenario))
            .collect(),
    }))
}

/// Record the outcome of one scenario within a run.
#[utoipa::path(
    patch,
    path = "/test-runs/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Test run ID")),
    request_body = UpdateRunResultRequest,
    responses(
        (status = 200, description = "Result updated", body = RunResultResponse),
        (status = 404, description = "Test run or result not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn update_run_result(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRunResultRequest>,
) -> AppResult<HttpResponse> {
    let (run, _access) = load_run(&pool, path.into_inner(), auth.user_id).await?;
    let req = body.into_inner();

    let result = pool
        .update_run_result(
            run.id,
            req.result_id,
            req.status,
            non_blank(req.note.as_deref()),
        )
        .await?;
    info!(run_id = %run.id, result_id = %result.id, status = %result.status, "Run result updated");

    Ok(ApiResponse::ok(RunResultResponse::new(result, None)))
}

/// Delete a run; owner or admin only.
#[utoipa::path(
    delete,
    path = "/test-runs/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Test run ID")),
    responses(
        (status = 200, description = "Test run deleted", body = DeletedResponse),
        (status = 403, description = "Owner or admin required", body = crate::error::ErrorResponse),
        (status = 404, description = "Test run not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn delete_test_run(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (run, access) = load_run(&pool, path.into_inner(), auth.user_id).await?;
    access.require_manager()?;

    pool.delete_test_run(run.id).await?;
    info!(run_id = %run.id, "Test run deleted");
    Ok(ApiResponse::ok(DeletedResponse { id: run.id }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/test-runs")
            .route(web::get().to(list_test_runs))
            .route(web::post().to(create_test_run)),
    )
    .service(
        web::resource("/test-runs/{id}")
            .route(web::get().to(get_test_run))
            .route(web::patch().to(update_run_result))
            .route(web::delete().to(delete_test_run)),
    );
}
