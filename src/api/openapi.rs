//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QA Scenario Server",
        version = "0.1.0",
        description = "Generate QA test scenarios from product requirements and track their execution"
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        api::health::health,
        api::health::ready,
        // Auth
        services::account::register,
        services::account::login,
        services::account::logout,
        services::account::me,
        // Users
        api::users::list_users,
        // Projects
        api::projects::list_projects,
        api::projects::create_project,
        api::projects::get_project,
        api::projects::update_project,
        api::projects::delete_project,
        api::projects::export_project,
        // Members
        api::members::list_members,
        api::members::invite_member,
        api::members::remove_member,
        // Scenarios
        api::generate::generate,
        api::scenarios::create_scenario,
        api::scenarios::update_scenario_status,
        api::scenarios::delete_scenario,
        api::scenarios::add_test_case,
        api::scenarios::delete_test_case,
        api::my_scenarios::my_scenarios,
        // Test runs
        api::test_runs::list_test_runs,
        api::test_runs::create_test_run,
        api::test_runs::get_test_run,
        api::test_runs::update_run_result,
        api::test_runs::delete_test_run,
    ),
    components(
        schemas(
            error::ErrorResponse,
            error::ErrorBody,
            api::DeletedResponse,
            api::health::HealthResponse,
            api::health::ReadyResponse,
            api::generate::GenerateRequest,
            api::generate::GenerateResponse,
            services::account::LogoutResponse,
            // Accounts
            models::RegisterRequest,
            models::LoginRequest,
            models::LoginResponse,
            models::UserResponse,
            models::UserSummary,
            // Projects and members
            models::Platform,
            models::CreateProjectRequest,
            models::UpdateProjectRequest,
            models::ProjectSummary,
            models::ProjectDetail,
            models::MemberRole,
            models::MemberUser,
            models::MemberResponse,
            models::InviteMemberRequest,
            // Scenarios
            models::Category,
            models::Priority,
            models::DeviceType,
            models::ScenarioStatus,
            models::ScenarioResponse,
            models::TestCaseResponse,
            models::CreateScenarioRequest,
            models::CreateTestCaseRequest,
            models::UpdateScenarioStatusRequest,
            models::ProjectRef,
            models::AssignedScenario,
            models::MyScenarioGroup,
            models::MyScenarioStats,
            models::MyScenariosResponse,
            // Test runs
            models::RunEnvironment,
            models::CreateTestRunRequest,
            models::UpdateRunResultRequest,
            models::RunStats,
            models::TestRunSummary,
            models::RunScenarioSummary,
            models::RunResultResponse,
            models::TestRunDetail,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration and sessions"),
        (name = "Users", description = "User directory"),
        (name = "Projects", description = "Projects and markdown export"),
        (name = "Members", description = "Project membership"),
        (name = "Scenarios", description = "Scenario generation and tracking"),
        (name = "Test Runs", description = "Test runs and their results")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Session security schemes: bearer JWT or the session cookie.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                    crate::auth::SESSION_COOKIE,
                ))),
            );
        }
    }
}
