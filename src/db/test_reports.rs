//! Database queries for test reports.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entity::test_report::{self, ActiveModel, Entity as TestReport};
use crate::error::{AppError, AppResult};
use crate::models::{ListReportsQuery, NewReport};

impl super::DbPool {
    /// Insert a new report row.
    pub async fn insert_report(&self, report: NewReport) -> AppResult<test_report::Model> {
        let model = ActiveModel {
            plan_id: Set(report.plan_id),
            plan_run_no: Set(report.plan_run_no),
            case_id: Set(report.case_id),
            status: Set(report.status),
            execution_time: Set(report.execution_time),
            logs: Set(report.logs),
            executed_at: Set(report.executed_at),
            executed_by: Set(report.executed_by),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert report: {}", e)))?;

        Ok(result)
    }

    /// Get a report by id.
    pub async fn get_report(&self, id: i32) -> AppResult<Option<test_report::Model>> {
        let result = TestReport::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report: {}", e)))?;

        Ok(result)
    }

    /// List reports with optional filtering, newest first.
    pub async fn list_reports(
        &self,
        query: &ListReportsQuery,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<test_report::Model>, u64)> {
        let mut select = TestReport::find();

        if let Some(ref status) = query.status
            && !status.trim().is_empty()
            && !status.eq_ignore_ascii_case("all")
        {
            select = select.filter(test_report::Column::Status.eq(status.trim()));
        }

        if let Some(plan_id) = query.plan_id
            && plan_id > 0
        {
            select = select.filter(test_report::Column::PlanId.eq(plan_id));
        }

        if let Some(run_no) = query.plan_run_no
            && run_no > 0
        {
            select = select.filter(test_report::Column::PlanRunNo.eq(run_no));
        }

        if let Some(ref keyword) = query.keyword
            && !keyword.trim().is_empty()
        {
            let keyword = keyword.trim();
            let mut condition =
                Condition::any().add(test_report::Column::Logs.contains(keyword));
            if let Ok(id) = keyword.parse::<i32>() {
                condition = condition.add(test_report::Column::Id.eq(id));
            }
            select = select.filter(condition);
        }

        // Malformed date filters are ignored rather than rejected
        if let Some(ref date) = query.date
            && let Ok(day) = date.trim().parse::<NaiveDate>()
        {
            let start = day.and_hms_opt(0, 0, 0).expect("midnight is valid");
            let end = start + chrono::Duration::days(1);
            select = select
                .filter(test_report::Column::ExecutedAt.gte(start))
                .filter(test_report::Column::ExecutedAt.lt(end));
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count reports: {}", e)))?;

        let reports = select
            .order_by_desc(test_report::Column::ExecutedAt)
            .order_by_desc(test_report::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list reports: {}", e)))?;

        Ok((reports, total))
    }

    /// Highest recorded run number for a plan, if any.
    pub async fn max_plan_run_no(&self, plan_id: i32) -> AppResult<Option<i32>> {
        let run_nos: Vec<Option<i32>> = TestReport::find()
            .filter(test_report::Column::PlanId.eq(plan_id))
            .select_only()
            .column(test_report::Column::PlanRunNo)
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query plan run numbers: {}", e)))?;

        Ok(run_nos.into_iter().flatten().filter(|n| *n > 0).max())
    }

    /// Reports executed at or after the given instant.
    pub async fn reports_since(&self, since: NaiveDateTime) -> AppResult<Vec<test_report::Model>> {
        let result = TestReport::find()
            .filter(test_report::Column::ExecutedAt.gte(since))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load reports: {}", e)))?;

        Ok(result)
    }

    /// Most recently executed reports.
    pub async fn recent_reports(&self, limit: u64) -> AppResult<Vec<test_report::Model>> {
        let result = TestReport::find()
            .order_by_desc(test_report::Column::ExecutedAt)
            .order_by_desc(test_report::Column::Id)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load recent reports: {}", e)))?;

        Ok(result)
    }

    /// Count all reports.
    pub async fn count_reports(&self) -> AppResult<i64> {
        let count = TestReport::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count reports: {}", e)))?;

        Ok(count as i64)
    }

    /// Mean execution time across all reports, if any carry one.
    pub async fn avg_execution_time(&self) -> AppResult<Option<f64>> {
        let times: Vec<Option<i32>> = TestReport::find()
            .select_only()
            .column(test_report::Column::ExecutionTime)
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query execution times: {}", e)))?;

        let times: Vec<i64> = times.into_iter().flatten().map(i64::from).collect();
        if times.is_empty() {
            return Ok(None);
        }

        Ok(Some(times.iter().sum::<i64>() as f64 / times.len() as f64))
    }

    /// Delete a report by id.
    pub async fn delete_report(&self, id: i32) -> AppResult<bool> {
        let result = TestReport::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete report: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete a batch of reports by id.
    pub async fn delete_reports_by_ids(&self, ids: &[i32]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = TestReport::delete_many()
            .filter(test_report::Column::Id.is_in(ids.to_vec()))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete reports: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// Delete all reports.
    pub async fn delete_all_reports(&self) -> AppResult<u64> {
        let result = TestReport::delete_many()
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete reports: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// Delete every report belonging to a plan.
    pub async fn delete_reports_for_plan(&self, plan_id: i32) -> AppResult<u64> {
        let result = TestReport::delete_many()
            .filter(test_report::Column::PlanId.eq(plan_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete plan reports: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// Delete every plan-linked report (used when deleting all plans).
    pub async fn delete_all_plan_reports(&self) -> AppResult<u64> {
        let result = TestReport::delete_many()
            .filter(test_report::Column::PlanId.is_not_null())
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete plan reports: {}", e)))?;

        Ok(result.rows_affected)
    }
}
