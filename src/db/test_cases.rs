//! Database queries for test cases.

use chrono::{Local, NaiveDateTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::test_case::{self, ActiveModel, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::{ListCasesQuery, SaveTestCaseRequest};

impl super::DbPool {
    /// Get a test case by id.
    pub async fn get_case(&self, id: i32) -> AppResult<Option<test_case::Model>> {
        let result = TestCase::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test case: {}", e)))?;

        Ok(result)
    }

    /// Bulk-load test cases by id.
    pub async fn list_cases_by_ids(&self, ids: &[i32]) -> AppResult<Vec<test_case::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TestCase::find()
            .filter(test_case::Column::Id.is_in(ids.to_vec()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load test cases: {}", e)))?;

        Ok(result)
    }

    /// List test cases with optional filtering and pagination.
    pub async fn list_cases(
        &self,
        query: &ListCasesQuery,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<test_case::Model>, u64)> {
        let mut select = TestCase::find();

        if let Some(ref keyword) = query.keyword
            && !keyword.trim().is_empty()
        {
            select = select.filter(test_case::Column::Name.contains(keyword.trim()));
        }

        if let Some(ref case_type) = query.case_type
            && !case_type.trim().is_empty()
        {
            select = select.filter(test_case::Column::CaseType.eq(case_type.trim()));
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))?;

        let ordered = if query.sort.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("created")) {
            select.order_by_desc(test_case::Column::CreatedAt)
        } else {
            select.order_by_desc(test_case::Column::UpdatedAt)
        };

        let cases = ordered
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))?;

        Ok((cases, total))
    }

    /// Insert a new test case.
    pub async fn insert_case(&self, req: SaveTestCaseRequest) -> AppResult<test_case::Model> {
        let now = Local::now().naive_local();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            case_type: Set(req.case_type.as_str().to_string()),
            status: Set(req.status.unwrap_or_else(|| "draft".to_string())),
            priority: Set(req.priority.unwrap_or_else(|| "medium".to_string())),
            content: Set(req.content),
            environment: Set(req.environment),
            created_by: Set(req.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))?;

        Ok(result)
    }

    /// Update an existing test case.
    pub async fn update_case(&self, req: SaveTestCaseRequest) -> AppResult<test_case::Model> {
        let id = req
            .id
            .ok_or_else(|| AppError::InvalidInput("test case id is required".to_string()))?;

        let existing = self
            .get_case(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test case {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(req.name);
        active.description = Set(req.description);
        active.case_type = Set(req.case_type.as_str().to_string());
        if let Some(status) = req.status {
            active.status = Set(status);
        }
        if let Some(priority) = req.priority {
            active.priority = Set(priority);
        }
        active.content = Set(req.content);
        active.environment = Set(req.environment);
        active.updated_at = Set(Local::now().naive_local());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test case: {}", e)))?;

        Ok(result)
    }

    /// Record the outcome of an execution on the case row.
    pub async fn mark_case_executed(
        &self,
        id: i32,
        last_run: NaiveDateTime,
        last_result: &str,
    ) -> AppResult<()> {
        let existing = self
            .get_case(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test case {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.last_run = Set(Some(last_run));
        active.last_result = Set(Some(last_result.to_string()));
        active.updated_at = Set(last_run);

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test case: {}", e)))?;

        Ok(())
    }

    /// Delete a test case by id.
    pub async fn delete_case(&self, id: i32) -> AppResult<bool> {
        let result = TestCase::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test case: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete all test cases.
    pub async fn delete_all_cases(&self) -> AppResult<u64> {
        let result = TestCase::delete_many()
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test cases: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// Count all test cases.
    pub async fn count_cases(&self) -> AppResult<i64> {
        let count = TestCase::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))?;

        Ok(count as i64)
    }

    /// Count test cases whose last result matches.
    pub async fn count_cases_by_last_result(&self, last_result: &str) -> AppResult<i64> {
        let count = TestCase::find()
            .filter(test_case::Column::LastResult.eq(last_result))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))?;

        Ok(count as i64)
    }
}
