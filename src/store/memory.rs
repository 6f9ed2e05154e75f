//! In-memory `ExecutionStore` used by engine unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

use crate::entity::{test_case, test_plan, test_report};
use crate::error::AppResult;
use crate::models::NewReport;

use super::ExecutionStore;

#[derive(Default)]
struct Inner {
    cases: BTreeMap<i32, test_case::Model>,
    plans: BTreeMap<i32, test_plan::Model>,
    reports: BTreeMap<i32, test_report::Model>,
    next_report_id: i32,
}

/// Map-backed store with the same observable behavior as the database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a case, minimal fields filled in.
    pub fn add_case(&self, id: i32, name: &str, case_type: &str, content: Option<&str>) {
        let now = Local::now().naive_local();
        let case = test_case::Model {
            id,
            name: name.to_string(),
            description: None,
            case_type: case_type.to_string(),
            status: "active".to_string(),
            priority: "medium".to_string(),
            content: content.map(str::to_string),
            environment: Some("dev".to_string()),
            last_run: None,
            last_result: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().cases.insert(id, case);
    }

    /// Seed a plan with a raw test_case_ids string.
    pub fn add_plan(&self, id: i32, name: &str, test_case_ids: &str) {
        let now = Local::now().naive_local();
        let plan = test_plan::Model {
            id,
            name: name.to_string(),
            description: None,
            environment: Some("dev".to_string()),
            test_case_ids: Some(test_case_ids.to_string()),
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().plans.insert(id, plan);
    }

    /// Seed a raw report row (for dashboard tests).
    pub fn add_report(
        &self,
        case_id: i32,
        status: &str,
        execution_time: Option<i32>,
        executed_at: NaiveDateTime,
    ) -> i32 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_report_id += 1;
        let id = inner.next_report_id;
        inner.reports.insert(
            id,
            test_report::Model {
                id,
                plan_id: None,
                plan_run_no: None,
                case_id,
                status: status.to_string(),
                execution_time,
                logs: None,
                executed_at,
                executed_by: "System".to_string(),
            },
        );
        id
    }

    pub fn report(&self, id: i32) -> Option<test_report::Model> {
        self.inner.lock().unwrap().reports.get(&id).cloned()
    }

    pub fn case(&self, id: i32) -> Option<test_case::Model> {
        self.inner.lock().unwrap().cases.get(&id).cloned()
    }

    pub fn report_count(&self) -> usize {
        self.inner.lock().unwrap().reports.len()
    }
}

#[async_trait]
impl ExecutionStore for MemoryStore {
    async fn get_case(&self, id: i32) -> AppResult<Option<test_case::Model>> {
        Ok(self.inner.lock().unwrap().cases.get(&id).cloned())
    }

    async fn list_cases_by_ids(&self, ids: &[i32]) -> AppResult<Vec<test_case::Model>> {
        let inner = self.inner.lock().unwrap();
        Ok(ids.iter().filter_map(|id| inner.cases.get(id).cloned()).collect())
    }

    async fn mark_case_executed(
        &self,
        id: i32,
        last_run: NaiveDateTime,
        last_result: &str,
    ) -> AppResult<()> {
        if let Some(case) = self.inner.lock().unwrap().cases.get_mut(&id) {
            case.last_run = Some(last_run);
            case.last_result = Some(last_result.to_string());
            case.updated_at = last_run;
        }
        Ok(())
    }

    async fn insert_report(&self, report: NewReport) -> AppResult<test_report::Model> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_report_id += 1;
        let id = inner.next_report_id;
        let model = test_report::Model {
            id,
            plan_id: report.plan_id,
            plan_run_no: report.plan_run_no,
            case_id: report.case_id,
            status: report.status,
            execution_time: report.execution_time,
            logs: report.logs,
            executed_at: report.executed_at,
            executed_by: report.executed_by,
        };
        inner.reports.insert(id, model.clone());
        Ok(model)
    }

    async fn get_plan(&self, id: i32) -> AppResult<Option<test_plan::Model>> {
        Ok(self.inner.lock().unwrap().plans.get(&id).cloned())
    }

    async fn max_plan_run_no(&self, plan_id: i32) -> AppResult<Option<i32>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reports
            .values()
            .filter(|r| r.plan_id == Some(plan_id))
            .filter_map(|r| r.plan_run_no)
            .filter(|n| *n > 0)
            .max())
    }

    async fn count_cases(&self) -> AppResult<i64> {
        Ok(self.inner.lock().unwrap().cases.len() as i64)
    }

    async fn count_cases_by_last_result(&self, last_result: &str) -> AppResult<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .cases
            .values()
            .filter(|c| c.last_result.as_deref() == Some(last_result))
            .count() as i64)
    }

    async fn count_reports(&self) -> AppResult<i64> {
        Ok(self.inner.lock().unwrap().reports.len() as i64)
    }

    async fn avg_execution_time(&self) -> AppResult<Option<f64>> {
        let inner = self.inner.lock().unwrap();
        let times: Vec<i64> = inner
            .reports
            .values()
            .filter_map(|r| r.execution_time)
            .map(i64::from)
            .collect();
        if times.is_empty() {
            return Ok(None);
        }
        Ok(Some(times.iter().sum::<i64>() as f64 / times.len() as f64))
    }

    async fn reports_since(&self, since: NaiveDateTime) -> AppResult<Vec<test_report::Model>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reports
            .values()
            .filter(|r| r.executed_at >= since)
            .cloned()
            .collect())
    }

    async fn recent_reports(&self, limit: u64) -> AppResult<Vec<test_report::Model>> {
        let inner = self.inner.lock().unwrap();
        let mut reports: Vec<_> = inner.reports.values().cloned().collect();
        reports.sort_by(|a, b| b.executed_at.cmp(&a.executed_at).then(b.id.cmp(&a.id)));
        reports.truncate(limit as usize);
        Ok(reports)
    }
}
