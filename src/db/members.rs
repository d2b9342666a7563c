//! Database queries for project membership.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::project_member::{self, ActiveModel, Entity as ProjectMember};
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::MemberRole;

use super::DbPool;

impl DbPool {
    /// Members of a project with their user rows, oldest invite first.
    pub async fn list_members(
        &self,
        project_id: Uuid,
    ) -> AppResult<Vec<(project_member::Model, Option<user::Model>)>> {
        ProjectMember::find()
            .filter(project_member::Column::ProjectId.eq(project_id))
            .find_also_related(user::Entity)
            .order_by_asc(project_member::Column::InvitedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list members: {}", e)))
    }

    /// Membership of one user in one project.
    pub async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<project_member::Model>> {
        ProjectMember::find()
            .filter(project_member::Column::ProjectId.eq(project_id))
            .filter(project_member::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find membership: {}", e)))
    }

    /// Get a membership by its ID.
    pub async fn get_membership(&self, id: Uuid) -> AppResult<Option<project_member::Model>> {
        ProjectMember::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get membership: {}", e)))
    }

    /// Add a user to a project.
    pub async fn insert_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> AppResult<project_member::Model> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            user_id: Set(user_id),
            role: Set(role.as_str().to_string()),
            invited_at: Set(Utc::now()),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert member: {}", e)))
    }

    /// Remove a membership.
    pub async fn delete_membership(&self, id: Uuid) -> AppResult<()> {
        ProjectMember::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete member: {}", e)))?;

        Ok(())
    }
}
