//! Project-level authorization.
//!
//! Owners are recorded on the project row; everyone else holds a
//! `project_members` row. Callers with no access get a 404 so project
//! ids cannot be probed.

use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::project;
use crate::error::{AppError, AppResult};
use crate::models::MemberRole;

/// A project together with the caller's role on it.
#[derive(Debug, Clone)]
pub struct ProjectAccess {
    pub project: project::Model,
    pub role: MemberRole,
}

impl ProjectAccess {
    /// Load a project the user can see.
    pub async fn load(pool: &DbPool, project_id: Uuid, user_id: Uuid) -> AppResult<Self> {
        let project = pool
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

        let role = Self::resolve_role(pool, &project, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

        Ok(Self { project, role })
    }

    async fn resolve_role(
        pool: &DbPool,
        project: &project::Model,
        user_id: Uuid,
    ) -> AppResult<Option<MemberRole>> {
        if project.owner_id == user_id {
            return Ok(Some(MemberRole::Owner));
        }
        Ok(pool
            .find_membership(project.id, user_id)
            .await?
            .map(|m| MemberRole::parse(&m.role).unwrap_or(MemberRole::Member)))
    }

    pub fn is_owner(&self) -> bool {
        self.role == MemberRole::Owner
    }

    /// Owner or admin.
    pub fn require_manager(&self) -> AppResult<()> {
        if self.role.can_manage() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the project owner or an admin can do this".to_string(),
            ))
        }
    }

    pub fn require_owner(&self) -> AppResult<()> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the project owner can do this".to_string(),
            ))
        }
    }
}
