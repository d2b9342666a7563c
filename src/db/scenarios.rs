//! Database queries for scenarios.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::scenario::{self, ActiveModel, Entity as Scenario};
use crate::entity::{project, test_case};
use crate::error::{AppError, AppResult};
use crate::models::{ScenarioDraft, ScenarioStatus};

use super::DbPool;

/// Changes applied by a scenario status update.
#[derive(Debug, Clone)]
pub struct ScenarioStatusChange {
    pub status: ScenarioStatus,
    pub failure_note: Option<String>,
    pub bug_ticket_url: Option<String>,
    /// `None` leaves the assignee unchanged; `Some(None)` unassigns
    pub assignee_id: Option<Option<Uuid>>,
    /// User recorded as executor when the status counts as executed
    pub actor_id: Uuid,
}

/// Insert one draft and its steps on the given connection or transaction.
async fn insert_draft<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    sort_order: i32,
    draft: ScenarioDraft,
) -> Result<(scenario::Model, Vec<test_case::Model>), sea_orm::DbErr> {
    let now = Utc::now();
    let scenario_id = Uuid::new_v4();

    let scenario = ActiveModel {
        id: Set(scenario_id),
        project_id: Set(project_id),
        title: Set(draft.title),
        description: Set(draft.description),
        category: Set(draft.category.as_str().to_string()),
        priority: Set(draft.priority.as_str().to_string()),
        device_type: Set(draft.device_type.as_str().to_string()),
        status: Set(ScenarioStatus::NotRun.as_str().to_string()),
        sort_order: Set(sort_order),
        assignee_id: Set(None),
        failure_note: Set(None),
        bug_ticket_url: Set(None),
        executed_at: Set(None),
        executed_by_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    let mut cases = Vec::with_capacity(draft.test_cases.len());
    for tc in draft.test_cases {
        let case = test_case::ActiveModel {
            id: Set(Uuid::new_v4()),
            scenario_id: Set(scenario_id),
            step: Set(tc.step),
            action: Set(tc.action),
            expected: Set(tc.expected),
        }
        .insert(db)
        .await?;
        cases.push(case);
    }
    cases.sort_by_key(|c| c.step);

    Ok((scenario, cases))
}

impl DbPool {
    /// Replace every scenario of a project with a new set, atomically.
    ///
    /// Old scenarios (with their test cases and run results) are deleted
    /// in the same transaction that inserts the new ones.
    pub async fn replace_scenarios(
        &self,
        project_id: Uuid,
        drafts: Vec<ScenarioDraft>,
    ) -> AppResult<Vec<(scenario::Model, Vec<test_case::Model>)>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        Scenario::delete_many()
            .filter(scenario::Column::ProjectId.eq(project_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete scenarios: {}", e)))?;

        let mut inserted = Vec::with_capacity(drafts.len());
        for (idx, draft) in drafts.into_iter().enumerate() {
            let row = insert_draft(&txn, project_id, idx as i32, draft)
                .await
                .map_err(|e| AppError::Database(format!("Failed to insert scenario: {}", e)))?;
            inserted.push(row);
        }

        project::Entity::update_many()
            .col_expr(project::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(project::Column::Id.eq(project_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to touch project: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit scenarios: {}", e)))?;

        Ok(inserted)
    }

    /// Append a manually written scenario after the existing ones.
    pub async fn insert_scenario(
        &self,
        project_id: Uuid,
        draft: ScenarioDraft,
    ) -> AppResult<(scenario::Model, Vec<test_case::Model>)> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let max_order: Option<i32> = Scenario::find()
            .select_only()
            .column_as(scenario::Column::SortOrder.max(), "max_order")
            .filter(scenario::Column::ProjectId.eq(project_id))
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read sort order: {}", e)))?
            .flatten();

        let row = insert_draft(&txn, project_id, max_order.map_or(0, |m| m + 1), draft)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert scenario: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit scenario: {}", e)))?;

        Ok(row)
    }

    /// Get a scenario by ID.
    pub async fn get_scenario(&self, id: Uuid) -> AppResult<Option<scenario::Model>> {
        Scenario::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get scenario: {}", e)))
    }

    /// All scenarios of a project in display order.
    pub async fn list_scenarios(&self, project_id: Uuid) -> AppResult<Vec<scenario::Model>> {
        Scenario::find()
            .filter(scenario::Column::ProjectId.eq(project_id))
            .order_by_asc(scenario::Column::SortOrder)
            .order_by_asc(scenario::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list scenarios: {}", e)))
    }

    /// Scenarios assigned to a user, with their projects.
    pub async fn list_assigned_scenarios(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<(scenario::Model, Option<project::Model>)>> {
        Scenario::find()
            .filter(scenario::Column::AssigneeId.eq(user_id))
            .find_also_related(project::Entity)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list assigned scenarios: {}", e)))
    }

    /// Update status, notes and assignee of a scenario.
    ///
    /// Executed statuses stamp `executed_at`/`executed_by_id`; NOT_RUN clears them.
    pub async fn update_scenario_status(
        &self,
        existing: scenario::Model,
        change: ScenarioStatusChange,
    ) -> AppResult<scenario::Model> {
        let now = Utc::now();
        let mut active: ActiveModel = existing.into();

        active.status = Set(change.status.as_str().to_string());
        active.failure_note = Set(change.failure_note);
        active.bug_ticket_url = Set(change.bug_ticket_url);
        if let Some(assignee_id) = change.assignee_id {
            active.assignee_id = Set(assignee_id);
        }
        if change.status.is_executed() {
            active.executed_at = Set(Some(now));
            active.executed_by_id = Set(Some(change.actor_id));
        } else {
            active.executed_at = Set(None);
            active.executed_by_id = Set(None);
        }
        active.updated_at = Set(now);

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update scenario: {}", e)))
    }

    /// Delete a scenario; its test cases and run results cascade.
    pub async fn delete_scenario(&self, id: Uuid) -> AppResult<()> {
        Scenario::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete scenario: {}", e)))?;

        Ok(())
    }
}
