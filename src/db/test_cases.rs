//! Database queries for scenario test cases.
//!
//! Steps within a scenario stay a contiguous 1..N sequence after every mutation.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entity::test_case::{self, ActiveModel, Entity as TestCase};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Test cases of one scenario ordered by step.
    pub async fn list_test_cases(&self, scenario_id: Uuid) -> AppResult<Vec<test_case::Model>> {
        TestCase::find()
            .filter(test_case::Column::ScenarioId.eq(scenario_id))
            .order_by_asc(test_case::Column::Step)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))
    }

    /// Test cases of many scenarios, grouped by scenario and ordered by step.
    pub async fn test_cases_by_scenario(
        &self,
        scenario_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<test_case::Model>>> {
        let mut grouped: HashMap<Uuid, Vec<test_case::Model>> = HashMap::new();
        if scenario_ids.is_empty() {
            return Ok(grouped);
        }

        let cases = TestCase::find()
            .filter(test_case::Column::ScenarioId.is_in(scenario_ids.iter().copied()))
            .order_by_asc(test_case::Column::ScenarioId)
            .order_by_asc(test_case::Column::Step)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))?;

        for case in cases {
            grouped.entry(case.scenario_id).or_default().push(case);
        }
        Ok(grouped)
    }

    /// Append a test case as step `max + 1`. Gaps left by generated steps are
    /// kept; only deletion renumbers.
    pub async fn append_test_case(
        &self,
        scenario_id: Uuid,
        action: &str,
        expected: &str,
    ) -> AppResult<test_case::Model> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let max_step: Option<i32> = TestCase::find()
            .select_only()
            .column_as(test_case::Column::Step.max(), "max_step")
            .filter(test_case::Column::ScenarioId.eq(scenario_id))
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read last step: {}", e)))?
            .flatten();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            scenario_id: Set(scenario_id),
            step: Set(max_step.unwrap_or(0) + 1),
            action: Set(action.to_string()),
            expected: Set(expected.to_string()),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit test case: {}", e)))?;

        Ok(model)
    }

    /// Delete one test case and renumber the remaining steps 1..N.
    ///
    /// Returns the remaining test cases in order.
    pub async fn delete_test_case(
        &self,
        scenario_id: Uuid,
        test_case_id: Uuid,
    ) -> AppResult<Vec<test_case::Model>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let deleted = TestCase::delete_many()
            .filter(test_case::Column::Id.eq(test_case_id))
            .filter(test_case::Column::ScenarioId.eq(scenario_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test case: {}", e)))?;

        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound("Test case".to_string()));
        }

        let remaining = TestCase::find()
            .filter(test_case::Column::ScenarioId.eq(scenario_id))
            .order_by_asc(test_case::Column::Step)
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))?;

        let mut renumbered = Vec::with_capacity(remaining.len());
        for (idx, case) in remaining.into_iter().enumerate() {
            let step = idx as i32 + 1;
            if case.step == step {
                renumbered.push(case);
                continue;
            }
            let mut active: ActiveModel = case.into();
            active.step = Set(step);
            let updated = active
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to renumber test case: {}", e)))?;
            renumbered.push(updated);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit renumbering: {}", e)))?;

        Ok(renumbered)
    }
}
