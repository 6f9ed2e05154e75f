//! Database queries for test plans.

use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::test_plan::{self, ActiveModel, Entity as TestPlan};
use crate::error::{AppError, AppResult};
use crate::models::SaveTestPlanRequest;

impl super::DbPool {
    /// Get a test plan by id.
    pub async fn get_plan(&self, id: i32) -> AppResult<Option<test_plan::Model>> {
        let result = TestPlan::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test plan: {}", e)))?;

        Ok(result)
    }

    /// Bulk-load test plans by id.
    pub async fn list_plans_by_ids(&self, ids: &[i32]) -> AppResult<Vec<test_plan::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TestPlan::find()
            .filter(test_plan::Column::Id.is_in(ids.to_vec()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load test plans: {}", e)))?;

        Ok(result)
    }

    /// List test plans, newest first, with pagination.
    pub async fn list_plans(
        &self,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<test_plan::Model>, u64)> {
        let total = TestPlan::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test plans: {}", e)))?;

        let plans = TestPlan::find()
            .order_by_desc(test_plan::Column::CreatedAt)
            .order_by_desc(test_plan::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test plans: {}", e)))?;

        Ok((plans, total))
    }

    /// Insert a new test plan.
    pub async fn insert_plan(&self, req: SaveTestPlanRequest) -> AppResult<test_plan::Model> {
        let now = Local::now().naive_local();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            environment: Set(req.environment),
            test_case_ids: Set(req.test_case_ids),
            created_by: Set(req.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test plan: {}", e)))?;

        Ok(result)
    }

    /// Update an existing test plan.
    pub async fn update_plan(&self, req: SaveTestPlanRequest) -> AppResult<test_plan::Model> {
        let id = req
            .id
            .ok_or_else(|| AppError::InvalidInput("test plan id is required".to_string()))?;

        let existing = self
            .get_plan(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test plan {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(req.name);
        active.description = Set(req.description);
        active.environment = Set(req.environment);
        active.test_case_ids = Set(req.test_case_ids);
        active.updated_at = Set(Local::now().naive_local());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test plan: {}", e)))?;

        Ok(result)
    }

    /// Delete a test plan by id.
    pub async fn delete_plan(&self, id: i32) -> AppResult<bool> {
        let result = TestPlan::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test plan: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete all test plans.
    pub async fn delete_all_plans(&self) -> AppResult<u64> {
        let result = TestPlan::delete_many()
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test plans: {}", e)))?;

        Ok(result.rows_affected)
    }
}
