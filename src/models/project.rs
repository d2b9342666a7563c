//! Project models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{MemberRole, ScenarioResponse, UserSummary};
use crate::entity::project;
use crate::error::{AppError, AppResult};

/// Minimum PRD length accepted for a project.
pub const MIN_PRD_LEN: usize = 10;

/// Which app a project targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    #[default]
    ConsumerApp,
    SellerApp,
    Both,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConsumerApp => "CONSUMER_APP",
            Self::SellerApp => "SELLER_APP",
            Self::Both => "BOTH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONSUMER_APP" => Some(Self::ConsumerApp),
            "SELLER_APP" => Some(Self::SellerApp),
            "BOTH" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ConsumerApp => "Consumer app",
            Self::SellerApp => "Seller app",
            Self::Both => "Consumer and seller apps",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Create project request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub prd_content: String,
    pub prd_notion_url: Option<String>,
    pub app_version: Option<String>,
    #[serde(default)]
    pub platform: Platform,
    /// `YYYY-MM-DD` or RFC 3339
    pub release_date: Option<String>,
}

/// Validated project fields.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub prd_content: String,
    pub prd_notion_url: Option<String>,
    pub app_version: Option<String>,
    pub platform: Platform,
    pub release_date: Option<NaiveDate>,
}

impl CreateProjectRequest {
    pub fn validate(self) -> AppResult<NewProject> {
        Ok(NewProject {
            title: validate_title(&self.title)?,
            description: super::non_blank(self.description.as_deref()),
            prd_content: validate_prd(&self.prd_content)?,
            prd_notion_url: validate_notion_url(self.prd_notion_url.as_deref())?,
            app_version: super::non_blank(self.app_version.as_deref()),
            platform: self.platform,
            release_date: parse_release_date(self.release_date.as_deref())?,
        })
    }
}

/// Partial project update; only provided fields change.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prd_content: Option<String>,
    pub prd_notion_url: Option<String>,
    pub app_version: Option<String>,
    pub platform: Option<Platform>,
    pub release_date: Option<String>,
}

/// Validated partial update. Inner `None` on optional columns clears them.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub prd_content: Option<String>,
    pub prd_notion_url: Option<Option<String>>,
    pub app_version: Option<Option<String>>,
    pub platform: Option<Platform>,
    pub release_date: Option<Option<NaiveDate>>,
}

impl UpdateProjectRequest {
    pub fn validate(self) -> AppResult<ProjectChanges> {
        Ok(ProjectChanges {
            title: self.title.as_deref().map(validate_title).transpose()?,
            description: self.description.map(|d| super::non_blank(Some(&d))),
            prd_content: self.prd_content.as_deref().map(validate_prd).transpose()?,
            prd_notion_url: self
                .prd_notion_url
                .map(|u| validate_notion_url(Some(&u)))
                .transpose()?,
            app_version: self.app_version.map(|v| super::non_blank(Some(&v))),
            platform: self.platform,
            release_date: self
                .release_date
                .map(|d| parse_release_date(Some(&d)))
                .transpose()?,
        })
    }
}

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(title.to_string())
}

fn validate_prd(prd: &str) -> AppResult<String> {
    if prd.trim().chars().count() < MIN_PRD_LEN {
        return Err(AppError::Validation(format!(
            "PRD content must be at least {} characters",
            MIN_PRD_LEN
        )));
    }
    Ok(prd.to_string())
}

fn validate_notion_url(url: Option<&str>) -> AppResult<Option<String>> {
    match super::non_blank(url) {
        Some(u) if !super::is_http_url(&u) => Err(AppError::Validation(
            "PRD link must be a valid URL".to_string(),
        )),
        other => Ok(other),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; blank means none.
pub fn parse_release_date(value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    let Some(raw) = super::non_blank(value) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| AppError::Validation(format!("Invalid release date: {}", raw)))
}

/// Project list item.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub platform: String,
    pub app_version: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub owner_id: Uuid,
    /// Caller's role on this project
    pub role: MemberRole,
    pub scenario_count: u64,
    pub test_run_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectSummary {
    pub fn new(m: project::Model, role: MemberRole, scenario_count: u64, test_run_count: u64) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            platform: m.platform,
            app_version: m.app_version,
            release_date: m.release_date,
            owner_id: m.owner_id,
            role,
            scenario_count,
            test_run_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Project with PRD, scenarios and test cases.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub prd_content: String,
    pub prd_notion_url: Option<String>,
    pub app_version: Option<String>,
    pub platform: String,
    pub release_date: Option<NaiveDate>,
    pub owner: Option<UserSummary>,
    pub role: MemberRole,
    pub scenarios: Vec<ScenarioResponse>,
    pub test_run_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectDetail {
    pub fn new(
        m: project::Model,
        owner: Option<UserSummary>,
        role: MemberRole,
        scenarios: Vec<ScenarioResponse>,
        test_run_count: u64,
    ) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            prd_content: m.prd_content,
            prd_notion_url: m.prd_notion_url,
            app_version: m.app_version,
            platform: m.platform,
            release_date: m.release_date,
            owner,
            role,
            scenarios,
            test_run_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
