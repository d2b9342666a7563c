//! Scenarios assigned to the signed-in user.

use actix_web::{HttpResponse, web};

use super::scenarios::scenario_responses;
use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    ApiResponse, AssignedScenario, MyScenarioGroup, MyScenarioStats, MyScenariosResponse,
    Priority, ProjectRef, ScenarioStatus,
};

fn status_of(s: &AssignedScenario) -> ScenarioStatus {
    ScenarioStatus::parse(&s.scenario.status).unwrap_or_default()
}

fn priority_of(s: &AssignedScenario) -> Priority {
    Priority::parse(&s.scenario.priority).unwrap_or_default()
}

fn tally(items: &[AssignedScenario]) -> MyScenarioStats {
    items.iter().fold(
        MyScenarioStats {
            total: items.len() as u64,
            ..Default::default()
        },
        |mut stats, item| {
            match status_of(item) {
                ScenarioStatus::NotRun => stats.not_run += 1,
                ScenarioStatus::Pass => stats.pass += 1,
                ScenarioStatus::Fail => stats.fail += 1,
                ScenarioStatus::Blocked => stats.blocked += 1,
                ScenarioStatus::Skipped => {}
            }
            stats
        },
    )
}

fn group_by_project(items: &[AssignedScenario]) -> Vec<MyScenarioGroup> {
    let mut groups: Vec<MyScenarioGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.project.id == item.project.id) {
            Some(group) => group.scenarios.push(item.scenario.clone()),
            None => groups.push(MyScenarioGroup {
                project: item.project.clone(),
                scenarios: vec![item.scenario.clone()],
            }),
        }
    }
    groups
}

/// My assigned scenarios, open work first.
///
/// Sorted by status (NOT_RUN first), then priority (CRITICAL first), then
/// most recently updated.
#[utoipa::path(
    get,
    path = "/my/scenarios",
    tag = "Scenarios",
    responses(
        (status = 200, description = "Assigned scenarios with grouping and stats", body = MyScenariosResponse),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
    ),
    security(("session" = []))
)]
pub async fn my_scenarios(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let rows = pool.list_assigned_scenarios(auth.user_id).await?;

    let (scenarios, projects): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .filter_map(|(scenario, project)| project.map(|p| (scenario, p)))
        .unzip();

    let responses = scenario_responses(&pool, scenarios).await?;
    let mut items: Vec<AssignedScenario> = responses
        .into_iter()
        .zip(projects)
        .map(|(scenario, project)| AssignedScenario {
            scenario,
            project: ProjectRef {
                id: project.id,
                title: project.title,
                platform: project.platform,
            },
        })
        .collect();

    items.sort_by(|a, b| {
        status_of(a)
            .cmp(&status_of(b))
            .then_with(|| priority_of(a).cmp(&priority_of(b)))
            .then_with(|| b.scenario.updated_at.cmp(&a.scenario.updated_at))
    });

    let stats = tally(&items);
    let grouped_by_project = group_by_project(&items);

    Ok(ApiResponse::ok(MyScenariosResponse {
        scenarios: items,
        grouped_by_project,
        stats,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/my/scenarios").route(web::get().to(my_scenarios)));
}
