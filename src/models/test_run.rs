//! Test run models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ScenarioStatus;
use crate::entity::{scenario, test_run, test_run_result};
use crate::error::{AppError, AppResult};

/// Where a test run executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunEnvironment {
    #[default]
    Staging,
    Production,
}

impl RunEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staging => "STAGING",
            Self::Production => "PRODUCTION",
        }
    }
}

impl std::fmt::Display for RunEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Create test run request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRunRequest {
    pub project_id: Uuid,
    pub name: String,
    pub app_version: String,
    #[serde(default)]
    pub environment: RunEnvironment,
}

impl CreateTestRunRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        if self.app_version.trim().is_empty() {
            return Err(AppError::Validation("App version is required".to_string()));
        }
        Ok(())
    }
}

/// Query for listing test runs.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTestRunsQuery {
    pub project_id: Uuid,
}

/// Update one result of a test run.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRunResultRequest {
    pub result_id: Uuid,
    pub status: ScenarioStatus,
    pub note: Option<String>,
}

/// Result counts per status.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub total: u64,
    pub pass: u64,
    pub fail: u64,
    pub blocked: u64,
    pub skipped: u64,
    pub not_run: u64,
}

impl RunStats {
    /// Count statuses; unknown values are counted in `total` only.
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Self {
        let mut stats = RunStats::default();
        for status in statuses {
            stats.total += 1;
            match ScenarioStatus::parse(status) {
                Some(ScenarioStatus::Pass) => stats.pass += 1,
                Some(ScenarioStatus::Fail) => stats.fail += 1,
                Some(ScenarioStatus::Blocked) => stats.blocked += 1,
                Some(ScenarioStatus::Skipped) => stats.skipped += 1,
                Some(ScenarioStatus::NotRun) => stats.not_run += 1,
                None => {}
            }
        }
        stats
    }
}

/// Test run list item.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestRunSummary {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub app_version: String,
    pub environment: String,
    pub started_at: DateTime<Utc>,
    pub stats: RunStats,
}

impl TestRunSummary {
    pub fn new(m: test_run::Model, stats: RunStats) -> Self {
        Self {
            id: m.id,
            project_id: m.project_id,
            name: m.name,
            app_version: m.app_version,
            environment: m.environment,
            started_at: m.started_at,
            stats,
        }
    }
}

/// Scenario fields shown next to a run result.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunScenarioSummary {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub priority: String,
    pub device_type: String,
}

impl From<scenario::Model> for RunScenarioSummary {
    fn from(m: scenario::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            category: m.category,
            priority: m.priority,
            device_type: m.device_type,
        }
    }
}

/// One scenario's outcome within a run.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunResultResponse {
    pub id: Uuid,
    pub test_run_id: Uuid,
    pub scenario_id: Uuid,
    pub status: String,
    pub note: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<RunScenarioSummary>,
}

impl RunResultResponse {
    pub fn new(m: test_run_result::Model, scenario: Option<scenario::Model>) -> Self {
        Self {
            id: m.id,
            test_run_id: m.test_run_id,
            scenario_id: m.scenario_id,
            status: m.status,
            note: m.note,
            executed_at: m.executed_at,
            scenario: scenario.map(Into::into),
        }
    }
}

/// Test run with every result and its stats.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestRunDetail {
    #[serde(flatten)]
    pub run: TestRunSummary,
    pub project_title: String,
    pub results: Vec<RunResultResponse>,
}
