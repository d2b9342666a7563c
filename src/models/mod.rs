//! Domain models and DTOs.

use actix_web::HttpResponse;
use serde::{Deserialize, Deserializer, Serialize};

pub mod member;
pub mod project;
pub mod scenario;
pub mod test_run;
pub mod user;

// Re-export commonly used types
pub use member::{InviteMemberRequest, MemberResponse, MemberRole, MemberUser, RemoveMemberQuery};
pub use project::{
    CreateProjectRequest, NewProject, Platform, ProjectChanges, ProjectDetail, ProjectSummary,
    UpdateProjectRequest,
};
pub use scenario::{
    AssignedScenario, Category, CreateScenarioRequest, CreateTestCaseRequest,
    DeleteTestCaseQuery, DeviceType, MyScenarioGroup, MyScenarioStats, MyScenariosResponse,
    Priority, ProjectRef, ScenarioDraft, ScenarioResponse, ScenarioStatus, TestCaseDraft,
    TestCaseResponse, UpdateScenarioStatusRequest,
};
pub use test_run::{
    CreateTestRunRequest, ListTestRunsQuery, RunEnvironment, RunResultResponse,
    RunScenarioSummary, RunStats, TestRunDetail, TestRunSummary, UpdateRunResultRequest,
};
pub use user::{
    LoginRequest, LoginResponse, RegisterRequest, SessionClaims, UserResponse, UserSummary,
};

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// 200 OK with the envelope.
    pub fn ok(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(data))
    }

    /// 201 Created with the envelope.
    pub fn created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Self::new(data))
    }
}

/// Deserialize a present field (including `null`) as `Some`, so that
/// `Option<Option<T>>` can tell "absent" from "explicitly null".
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Trim an optional string, mapping blank input to `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Whether a string is an absolute http(s) URL.
pub(crate) fn is_http_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}
