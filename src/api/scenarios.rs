//! Scenario endpoints: manual creation, status tracking, deletion and
//! test case edits. Every project member may use them.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use super::DeletedResponse;
use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::db::scenarios::ScenarioStatusChange;
use crate::entity::scenario;
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiResponse, CreateScenarioRequest, CreateTestCaseRequest, DeleteTestCaseQuery,
    ScenarioResponse, TestCaseResponse, UpdateScenarioStatusRequest, UserSummary, non_blank,
};
use crate::services::ProjectAccess;

/// Attach test cases and assignees to scenarios, keeping their order.
pub(crate) async fn scenario_responses(
    pool: &DbPool,
    scenarios: Vec<scenario::Model>,
) -> AppResult<Vec<ScenarioResponse>> {
    let ids: Vec<Uuid> = scenarios.iter().map(|s| s.id).collect();
    let mut cases = pool.test_cases_by_scenario(&ids).await?;

    let mut assignee_ids: Vec<Uuid> = scenarios.iter().filter_map(|s| s.assignee_id).collect();
    assignee_ids.sort();
    assignee_ids.dedup();
    let assignees: HashMap<Uuid, UserSummary> = pool
        .find_users_by_ids(&assignee_ids)
        .await?
        .iter()
        .map(|u| (u.id, UserSummary::from(u)))
        .collect();

    Ok(scenarios
        .into_iter()
        .map(|s| {
            let steps = cases.remove(&s.id).unwrap_or_default();
            let assignee = s.assignee_id.and_then(|id| assignees.get(&id).cloned());
            ScenarioResponse::new(s, steps, assignee)
        })
        .collect())
}

/// Load a scenario and the caller's access to its project.
async fn load_scenario(
    pool: &DbPool,
    scenario_id: Uuid,
    user_id: Uuid,
) -> AppResult<(scenario::Model, ProjectAccess)> {
    let scenario = pool
        .get_scenario(scenario_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Scenario".to_string()))?;
    let access = ProjectAccess::load(pool, scenario.project_id, user_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Scenario".to_string()),
            other => other,
        })?;
    Ok((scenario, access))
}

/// Add a scenario by hand; it goes to the end of the list.
#[utoipa::path(
    post,
    path = "/projects/{id}/scenarios",
    tag = "Scenarios",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = CreateScenarioRequest,
    responses(
        (status = 201, description = "Scenario created", body = ScenarioResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn create_scenario(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateScenarioRequest>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, path.into_inner(), auth.user_id).await?;
    let draft = body.into_inner().into_draft()?;

    let (scenario, cases) = pool.insert_scenario(access.project.id, draft).await?;
    info!(scenario_id = %scenario.id, project_id = %access.project.id, "Scenario added");

    Ok(ApiResponse::created(ScenarioResponse::new(scenario, cases, None)))
}

/// Record an execution result and optionally reassign.
#[utoipa::path(
    patch,
    path = "/scenarios/{id}/status",
    tag = "Scenarios",
    params(("id" = Uuid, Path, description = "Scenario ID")),
    request_body = UpdateScenarioStatusRequest,
    responses(
        (status = 200, description = "Scenario updated", body = ScenarioResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Scenario not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn update_scenario_status(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateScenarioStatusRequest>,
) -> AppResult<HttpResponse> {
    let (scenario, _access) = load_scenario(&pool, path.into_inner(), auth.user_id).await?;
    let req = body.into_inner();
    req.validate()?;

    if let Some(Some(assignee_id)) = req.assignee_id
        && pool.find_user_by_id(assignee_id).await?.is_none()
    {
        return Err(AppError::Validation("Assignee does not exist".to_string()));
    }

    let change = ScenarioStatusChange {
        status: req.status,
        failure_note: non_blank(req.failure_note.as_deref()),
        bug_ticket_url: non_blank(req.bug_ticket_url.as_deref()),
        assignee_id: req.assignee_id,
        actor_id: auth.user_id,
    };
    let updated = pool.update_scenario_status(scenario, change).await?;
    info!(scenario_id = %updated.id, status = %updated.status, "Scenario status updated");

    let response = scenario_responses(&pool, vec![updated])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound("Scenario".to_string()))?;
    Ok(ApiResponse::ok(response))
}

/// Delete a scenario with its test cases and run results.
#[utoipa::path(
    delete,
    path = "/scenarios/{id}",
    tag = "Scenarios",
    params(("id" = Uuid, Path, description = "Scenario ID")),
    responses(
        (status = 200, description = "Scenario deleted", body = DeletedResponse),
        (status = 404, description = "Scenario not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn delete_scenario(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (scenario, _access) = load_scenario(&pool, path.into_inner(), auth.user_id).await?;
    pool.delete_scenario(scenario.id).await?;
    info!(scenario_id = %scenario.id, "Scenario deleted");
    Ok(ApiResponse::ok(DeletedResponse { id: scenario.id }))
}

/// Append a step to a scenario.
#[utoipa::path(
    post,
    path = "/scenarios/{id}/test-cases",
    tag = "Scenarios",
    params(("id" = Uuid, Path, description = "Scenario ID")),
    request_body = CreateTestCaseRequest,
    responses(
        (status = 201, description = "Test case appended", body = TestCaseResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Scenario not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn add_test_case(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let (scenario, _access) = load_scenario(&pool, path.into_inner(), auth.user_id).await?;
    let req = body.into_inner();
    req.validate()?;

    let case = pool
        .append_test_case(scenario.id, req.action.trim(), req.expected.trim())
        .await?;
    Ok(ApiResponse::created(TestCaseResponse::from(case)))
}

/// Delete a step; the remaining steps are renumbered from 1.
#[utoipa::path(
    delete,
    path = "/scenarios/{id}/test-cases",
    tag = "Scenarios",
    params(
        ("id" = Uuid, Path, description = "Scenario ID"),
        ("testCaseId" = Uuid, Query, description = "Test case to delete")
    ),
    responses(
        (status = 200, description = "Remaining test cases", body = Vec<TestCaseResponse>),
        (status = 404, description = "Scenario or test case not found", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn delete_test_case(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<DeleteTestCaseQuery>,
) -> AppResult<HttpResponse> {
    let (scenario, _access) = load_scenario(&pool, path.into_inner(), auth.user_id).await?;
    let remaining = pool.delete_test_case(scenario.id, query.test_case_id).await?;
    let data: Vec<TestCaseResponse> = remaining.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok(data))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{id}/scenarios").route(web::post().to(create_scenario)),
    )
    .service(
        web::resource("/scenarios/{id}/status").route(web::patch().to(update_scenario_status)),
    )
    .service(web::resource("/scenarios/{id}").route(web::delete().to(delete_scenario)))
    .service(
        web::resource("/scenarios/{id}/test-cases")
            .route(web::post().to(add_test_case))
            .route(web::delete().to(delete_test_case)),
    );
}
