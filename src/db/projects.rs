//! Database queries for projects.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::project::{self, ActiveModel, Entity as Project};
use crate::entity::{project_member, scenario, test_run};
use crate::error::{AppError, AppResult};
use crate::models::{MemberRole, NewProject, ProjectChanges};

use super::DbPool;

impl DbPool {
    /// Insert a new project owned by `owner_id`.
    pub async fn insert_project(
        &self,
        owner_id: Uuid,
        new_project: NewProject,
    ) -> AppResult<project::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_project.title),
            description: Set(new_project.description),
            prd_content: Set(new_project.prd_content),
            prd_notion_url: Set(new_project.prd_notion_url),
            app_version: Set(new_project.app_version),
            platform: Set(new_project.platform.as_str().to_string()),
            release_date: Set(new_project.release_date),
            owner_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert project: {}", e)))
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: Uuid) -> AppResult<Option<project::Model>> {
        Project::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))
    }

    /// Projects the user owns or is a member of, most recently updated first.
    pub async fn list_projects_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<(project::Model, MemberRole)>> {
        let memberships = project_member::Entity::find()
            .filter(project_member::Column::UserId.eq(user_id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list memberships: {}", e)))?;

        let member_roles: HashMap<Uuid, MemberRole> = memberships
            .into_iter()
            .map(|m| {
                let role = MemberRole::parse(&m.role).unwrap_or(MemberRole::Member);
                (m.project_id, role)
            })
            .collect();

        let mut condition = Condition::any().add(project::Column::OwnerId.eq(user_id));
        if !member_roles.is_empty() {
            condition = condition.add(project::Column::Id.is_in(member_roles.keys().copied()));
        }

        let projects = Project::find()
            .filter(condition)
            .order_by_desc(project::Column::UpdatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        Ok(projects
            .into_iter()
            .map(|p| {
                let role = if p.owner_id == user_id {
                    MemberRole::Owner
                } else {
                    member_roles
                        .get(&p.id)
                        .copied()
                        .unwrap_or(MemberRole::Member)
                };
                (p, role)
            })
            .collect())
    }

    /// Scenario counts keyed by project.
    pub async fn count_scenarios_by_project(
        &self,
        project_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, u64>> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = scenario::Entity::find()
            .select_only()
            .column(scenario::Column::ProjectId)
            .column_as(scenario::Column::Id.count(), "count")
            .filter(scenario::Column::ProjectId.is_in(project_ids.iter().copied()))
            .group_by(scenario::Column::ProjectId)
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count scenarios: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }

    /// Test run counts keyed by project.
    pub async fn count_test_runs_by_project(
        &self,
        project_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, u64>> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = test_run::Entity::find()
            .select_only()
            .column(test_run::Column::ProjectId)
            .column_as(test_run::Column::Id.count(), "count")
            .filter(test_run::Column::ProjectId.is_in(project_ids.iter().copied()))
            .group_by(test_run::Column::ProjectId)
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test runs: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }

    /// Number of test runs of one project.
    pub async fn count_test_runs(&self, project_id: Uuid) -> AppResult<u64> {
        test_run::Entity::find()
            .filter(test_run::Column::ProjectId.eq(project_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test runs: {}", e)))
    }

    /// Apply a partial update.
    pub async fn update_project(
        &self,
        existing: project::Model,
        changes: ProjectChanges,
    ) -> AppResult<project::Model> {
        let mut active: ActiveModel = existing.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(prd_content) = changes.prd_content {
            active.prd_content = Set(prd_content);
        }
        if let Some(url) = changes.prd_notion_url {
            active.prd_notion_url = Set(url);
        }
        if let Some(app_version) = changes.app_version {
            active.app_version = Set(app_version);
        }
        if let Some(platform) = changes.platform {
            active.platform = Set(platform.as_str().to_string());
        }
        if let Some(release_date) = changes.release_date {
            active.release_date = Set(release_date);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update project: {}", e)))
    }

    /// Delete a project; members, scenarios and runs cascade.
    pub async fn delete_project(&self, id: Uuid) -> AppResult<()> {
        Project::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete project: {}", e)))?;

        Ok(())
    }
}
