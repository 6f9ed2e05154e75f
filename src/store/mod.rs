//! The data-store interface consumed by the execution engine.
//!
//! The engine never talks to SeaORM directly; it sees only this trait. The
//! production implementation is [`DbPool`], and unit tests substitute an
//! in-memory store. Persistence failures propagate as errors: a report that
//! cannot be written means the run's outcome cannot be trusted as recorded.

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::db::DbPool;
use crate::entity::{test_case, test_plan, test_report};
use crate::error::AppResult;
use crate::models::NewReport;

/// Plain data-store operations backing case execution, plan runs and
/// dashboard aggregation.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Load a case by id.
    async fn get_case(&self, id: i32) -> AppResult<Option<test_case::Model>>;

    /// Bulk-load cases by id (missing ids are silently absent).
    async fn list_cases_by_ids(&self, ids: &[i32]) -> AppResult<Vec<test_case::Model>>;

    /// Record last-run/last-result on a case after an execution attempt.
    async fn mark_case_executed(
        &self,
        id: i32,
        last_run: NaiveDateTime,
        last_result: &str,
    ) -> AppResult<()>;

    /// Persist one execution report; returns the stored row with its id.
    async fn insert_report(&self, report: NewReport) -> AppResult<test_report::Model>;

    /// Load a plan by id.
    async fn get_plan(&self, id: i32) -> AppResult<Option<test_plan::Model>>;

    /// Highest positive run number recorded for a plan, if any.
    async fn max_plan_run_no(&self, plan_id: i32) -> AppResult<Option<i32>>;

    /// Total number of cases.
    async fn count_cases(&self) -> AppResult<i64>;

    /// Number of cases whose last result matches.
    async fn count_cases_by_last_result(&self, last_result: &str) -> AppResult<i64>;

    /// Total number of reports.
    async fn count_reports(&self) -> AppResult<i64>;

    /// Mean execution time across all reports carrying one.
    async fn avg_execution_time(&self) -> AppResult<Option<f64>>;

    /// Reports executed at or after the given instant.
    async fn reports_since(&self, since: NaiveDateTime) -> AppResult<Vec<test_report::Model>>;

    /// Most recently executed reports, newest first.
    async fn recent_reports(&self, limit: u64) -> AppResult<Vec<test_report::Model>>;
}

#[async_trait]
impl ExecutionStore for DbPool {
    async fn get_case(&self, id: i32) -> AppResult<Option<test_case::Model>> {
        DbPool::get_case(self, id).await
    }

    async fn list_cases_by_ids(&self, ids: &[i32]) -> AppResult<Vec<test_case::Model>> {
        DbPool::list_cases_by_ids(self, ids).await
    }

    async fn mark_case_executed(
        &self,
        id: i32,
        last_run: NaiveDateTime,
        last_result: &str,
    ) -> AppResult<()> {
        DbPool::mark_case_executed(self, id, last_run, last_result).await
    }

    async fn insert_report(&self, report: NewReport) -> AppResult<test_report::Model> {
        DbPool::insert_report(self, report).await
    }

    async fn get_plan(&self, id: i32) -> AppResult<Option<test_plan::Model>> {
        DbPool::get_plan(self, id).await
    }

    async fn max_plan_run_no(&self, plan_id: i32) -> AppResult<Option<i32>> {
        DbPool::max_plan_run_no(self, plan_id).await
    }

    async fn count_cases(&self) -> AppResult<i64> {
        DbPool::count_cases(self).await
    }

    async fn count_cases_by_last_result(&self, last_result: &str) -> AppResult<i64> {
        DbPool::count_cases_by_last_result(self, last_result).await
    }

    async fn count_reports(&self) -> AppResult<i64> {
        DbPool::count_reports(self).await
    }

    async fn avg_execution_time(&self) -> AppResult<Option<f64>> {
        DbPool::avg_execution_time(self).await
    }

    async fn reports_since(&self, since: NaiveDateTime) -> AppResult<Vec<test_report::Model>> {
        DbPool::reports_since(self, since).await
    }

    async fn recent_reports(&self, limit: u64) -> AppResult<Vec<test_report::Model>> {
        DbPool::recent_reports(self, limit).await
    }
}
