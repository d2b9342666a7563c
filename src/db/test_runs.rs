//! Database queries for test runs and their results.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::test_run::{self, ActiveModel, Entity as TestRun};
use crate::entity::{scenario, test_run_result};
use crate::error::{AppError, AppResult};
use crate::models::{RunEnvironment, ScenarioStatus};

use super::DbPool;

impl DbPool {
    /// Create a run with one NOT_RUN result per scenario currently in the project.
    pub async fn create_test_run(
        &self,
        project_id: Uuid,
        name: &str,
        app_version: &str,
        environment: RunEnvironment,
    ) -> AppResult<(test_run::Model, Vec<test_run_result::Model>)> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let run = ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            name: Set(name.to_string()),
            app_version: Set(app_version.to_string()),
            environment: Set(environment.as_str().to_string()),
            started_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert test run: {}", e)))?;

        let scenarios = scenario::Entity::find()
            .filter(scenario::Column::ProjectId.eq(project_id))
            .order_by_asc(scenario::Column::SortOrder)
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list scenarios: {}", e)))?;

        let mut results = Vec::with_capacity(scenarios.len());
        for s in scenarios {
            let result = test_run_result::ActiveModel {
                id: Set(Uuid::new_v4()),
                test_run_id: Set(run.id),
                scenario_id: Set(s.id),
                status: Set(ScenarioStatus::NotRun.as_str().to_string()),
                note: Set(None),
                executed_at: Set(None),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert run result: {}", e)))?;
            results.push(result);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit test run: {}", e)))?;

        Ok((run, results))
    }

    /// Runs of a project, newest first.
    pub async fn list_test_runs(&self, project_id: Uuid) -> AppResult<Vec<test_run::Model>> {
        TestRun::find()
            .filter(test_run::Column::ProjectId.eq(project_id))
            .order_by_desc(test_run::Column::StartedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test runs: {}", e)))
    }

    /// Result statuses of many runs, keyed by run.
    pub async fn run_statuses(&self, run_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<String>>> {
        let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
        if run_ids.is_empty() {
            return Ok(grouped);
        }

        let results = test_run_result::Entity::find()
            .filter(test_run_result::Column::TestRunId.is_in(run_ids.iter().copied()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list run results: {}", e)))?;

        for r in results {
            grouped.entry(r.test_run_id).or_default().push(r.status);
        }
        Ok(grouped)
    }

    /// Get a test run by ID.
    pub async fn get_test_run(&self, id: Uuid) -> AppResult<Option<test_run::Model>> {
        TestRun::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))
    }

    /// Results of a run with their scenarios, in scenario display order.
    pub async fn list_run_results(
        &self,
        run_id: Uuid,
    ) -> AppResult<Vec<(test_run_result::Model, Option<scenario::Model>)>> {
        test_run_result::Entity::find()
            .filter(test_run_result::Column::TestRunId.eq(run_id))
            .find_also_related(scenario::Entity)
            .order_by_asc(scenario::Column::SortOrder)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list run results: {}", e)))
    }

    /// Update one result of a run. Executed statuses stamp `executed_at`.
    ///
    /// Only the run result changes; the scenario's own status is untouched.
    pub async fn update_run_result(
        &self,
        run_id: Uuid,
        result_id: Uuid,
        status: ScenarioStatus,
        note: Option<String>,
    ) -> AppResult<test_run_result::Model> {
        let existing = test_run_result::Entity::find_by_id(result_id)
            .filter(test_run_result::Column::TestRunId.eq(run_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get run result: {}", e)))?
            .ok_or_else(|| AppError::NotFound("Test run result".to_string()))?;

        let mut active: test_run_result::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.note = Set(note);
        active.executed_at = Set(status.is_executed().then(Utc::now));

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update run result: {}", e)))
    }

    /// Delete a run; its results cascade.
    pub async fn delete_test_run(&self, id: Uuid) -> AppResult<()> {
        TestRun::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test run: {}", e)))?;

        Ok(())
    }
}
