//! Scenario generation endpoint.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{ApiResponse, Platform, ScenarioResponse};
use crate::services::ProjectAccess;
use crate::services::generation::{CompletionProvider, generate_scenarios};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub project_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub project_id: Uuid,
    pub count: usize,
    pub scenarios: Vec<ScenarioResponse>,
}

/// Regenerate a project's scenarios from its PRD.
///
/// The existing scenarios are replaced only after the model's answer
/// parses; a failed generation keeps them.
#[utoipa::path(
    post,
    path = "/generate",
    tag = "Scenarios",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Scenarios replaced", body = GenerateResponse),
        (status = 403, description = "Owner or admin required", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Generation failed or LLM not configured", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn generate(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    provider: web::Data<dyn CompletionProvider>,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let access = ProjectAccess::load(&pool, body.project_id, auth.user_id).await?;
    access.require_manager()?;

    let project = access.project;
    let platform = Platform::parse(&project.platform).unwrap_or_default();
    let drafts = generate_scenarios(provider.get_ref(), &project.prd_content, platform).await?;

    let stored = pool.replace_scenarios(project.id, drafts).await?;
    info!(project_id = %project.id, count = stored.len(), "Scenarios regenerated");

    let scenarios: Vec<ScenarioResponse> = stored
        .into_iter()
        .map(|(scenario, cases)| ScenarioResponse::new(scenario, cases, None))
        .collect();

    Ok(ApiResponse::ok(GenerateResponse {
        project_id: project.id,
        count: scenarios.len(),
        scenarios,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generate").route(web::post().to(generate)));
}
