//! Scenario and test case models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserSummary;
use crate::entity::{scenario, test_case};
use crate::error::{AppError, AppResult};

/// Scenario category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    Positive,
    Negative,
    EdgeCase,
    Payment,
    Pickup,
    Location,
    Notification,
    TimeSensitive,
    Inventory,
    Auth,
    Network,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Self::Positive,
        Self::Negative,
        Self::EdgeCase,
        Self::Payment,
        Self::Pickup,
        Self::Location,
        Self::Notification,
        Self::TimeSensitive,
        Self::Inventory,
        Self::Auth,
        Self::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::EdgeCase => "EDGE_CASE",
            Self::Payment => "PAYMENT",
            Self::Pickup => "PICKUP",
            Self::Location => "LOCATION",
            Self::Notification => "NOTIFICATION",
            Self::TimeSensitive => "TIME_SENSITIVE",
            Self::Inventory => "INVENTORY",
            Self::Auth => "AUTH",
            Self::Network => "NETWORK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Heading used in markdown exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Happy Path",
            Self::Negative => "Error Cases",
            Self::EdgeCase => "Edge Cases",
            Self::Payment => "Payment & Refunds",
            Self::Pickup => "Pickup Flow",
            Self::Location => "Location & Maps",
            Self::Notification => "Notifications",
            Self::TimeSensitive => "Time Sensitive",
            Self::Inventory => "Inventory Sync",
            Self::Auth => "Authentication & Sign-up",
            Self::Network => "Network",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scenario priority, most urgent first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "🔴 Critical",
            Self::High => "🟠 High",
            Self::Medium => "🟡 Medium",
            Self::Low => "🟢 Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target device family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Android,
    Ios,
    #[default]
    Both,
}

impl DeviceType {
    pub const ALL: [DeviceType; 3] = [Self::Android, Self::Ios, Self::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "ANDROID",
            Self::Ios => "IOS",
            Self::Both => "BOTH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Execution status, shared by scenarios and test run results.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioStatus {
    #[default]
    NotRun,
    Pass,
    Fail,
    Blocked,
    Skipped,
}

impl ScenarioStatus {
    pub const ALL: [ScenarioStatus; 5] = [
        Self::NotRun,
        Self::Pass,
        Self::Fail,
        Self::Blocked,
        Self::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRun => "NOT_RUN",
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Blocked => "BLOCKED",
            Self::Skipped => "SKIPPED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// Anything other than NOT_RUN counts as executed.
    pub fn is_executed(&self) -> bool {
        !matches!(self, Self::NotRun)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotRun => "⬜ Not run",
            Self::Pass => "✅ Pass",
            Self::Fail => "❌ Fail",
            Self::Blocked => "🟣 Blocked",
            Self::Skipped => "⏭️ Skipped",
        }
    }
}

impl std::fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized scenario ready to be stored, from the generator or a manual add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub device_type: DeviceType,
    pub test_cases: Vec<TestCaseDraft>,
}

/// One step of a scenario draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseDraft {
    pub step: i32,
    pub action: String,
    pub expected: String,
}

/// Test case as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResponse {
    pub id: Uuid,
    pub scenario_id: Uuid,
    pub step: i32,
    pub action: String,
    pub expected: String,
}

impl From<test_case::Model> for TestCaseResponse {
    fn from(m: test_case::Model) -> Self {
        Self {
            id: m.id,
            scenario_id: m.scenario_id,
            step: m.step,
            action: m.action,
            expected: m.expected,
        }
    }
}

/// Scenario as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: String,
    pub device_type: String,
    pub status: String,
    pub sort_order: i32,
    pub assignee_id: Option<Uuid>,
    pub assignee: Option<UserSummary>,
    pub failure_note: Option<String>,
    pub bug_ticket_url: Option<String>,
    pub executed_at: Option<DateTime<Utc>>,
    pub executed_by_id: Option<Uuid>,
    pub test_cases: Vec<TestCaseResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScenarioResponse {
    pub fn new(
        m: scenario::Model,
        test_cases: Vec<test_case::Model>,
        assignee: Option<UserSummary>,
    ) -> Self {
        Self {
            id: m.id,
            project_id: m.project_id,
            title: m.title,
            description: m.description,
            category: m.category,
            priority: m.priority,
            device_type: m.device_type,
            status: m.status,
            sort_order: m.sort_order,
            assignee_id: m.assignee_id,
            assignee,
            failure_note: m.failure_note,
            bug_ticket_url: m.bug_ticket_url,
            executed_at: m.executed_at,
            executed_by_id: m.executed_by_id,
            test_cases: test_cases.into_iter().map(Into::into).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Manually add a scenario to a project.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScenarioRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub device_type: DeviceType,
    #[serde(default)]
    pub test_cases: Vec<CreateTestCaseRequest>,
}

impl CreateScenarioRequest {
    pub fn into_draft(self) -> AppResult<ScenarioDraft> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        let mut test_cases = Vec::with_capacity(self.test_cases.len());
        for (idx, tc) in self.test_cases.into_iter().enumerate() {
            tc.validate()?;
            test_cases.push(TestCaseDraft {
                step: idx as i32 + 1,
                action: tc.action.trim().to_string(),
                expected: tc.expected.trim().to_string(),
            });
        }
        Ok(ScenarioDraft {
            title,
            description: super::non_blank(self.description.as_deref()),
            category: self.category,
            priority: self.priority,
            device_type: self.device_type,
            test_cases,
        })
    }
}

/// Scenario status update.
///
/// `assigneeId` absent leaves the assignee unchanged; `null` unassigns.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScenarioStatusRequest {
    pub status: ScenarioStatus,
    pub failure_note: Option<String>,
    pub bug_ticket_url: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_present")]
    #[schema(value_type = Option<Uuid>)]
    pub assignee_id: Option<Option<Uuid>>,
}

impl UpdateScenarioStatusRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(url) = self.bug_ticket_url.as_deref().map(str::trim)
            && !url.is_empty()
            && !super::is_http_url(url)
        {
            return Err(AppError::Validation(
                "Bug ticket URL must be a valid URL".to_string(),
            ));
        }
        Ok(())
    }
}

/// Append a test case to a scenario.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestCaseRequest {
    pub action: String,
    pub expected: String,
}

impl CreateTestCaseRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.action.trim().is_empty() {
            return Err(AppError::Validation("Action is required".to_string()));
        }
        if self.expected.trim().is_empty() {
            return Err(AppError::Validation(
                "Expected result is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query for test case deletion.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTestCaseQuery {
    pub test_case_id: Uuid,
}

/// Project reference attached to assigned scenarios.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectRef {
    pub id: Uuid,
    pub title: String,
    pub platform: String,
}

/// Scenario assigned to the caller, with its project.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignedScenario {
    #[serde(flatten)]
    pub scenario: ScenarioResponse,
    pub project: ProjectRef,
}

/// Assigned scenarios of one project.
#[derive(Debug, Serialize, ToSchema)]
pub struct MyScenarioGroup {
    pub project: ProjectRef,
    pub scenarios: Vec<ScenarioResponse>,
}

/// Status counts over the caller's assigned scenarios.
#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyScenarioStats {
    pub total: u64,
    pub not_run: u64,
    pub pass: u64,
    pub fail: u64,
    pub blocked: u64,
}

/// Response for the caller's assigned scenarios.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyScenariosResponse {
    pub scenarios: Vec<AssignedScenario>,
    pub grouped_by_project: Vec<MyScenarioGroup>,
    pub stats: MyScenarioStats,
}
