//! Plan execution: runs every case referenced by a plan under one run
//! number and aggregates the outcomes.
//!
//! Executions of the same plan are serialized through a per-plan lock so
//! that computing the next run number (read max, add one) cannot race with
//! a concurrent run of the same plan. Distinct plans run independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{PlanRunItem, PlanRunSummary};
use crate::store::ExecutionStore;

use super::executor::{CaseExecutor, PlanRef};

/// Registry of per-plan execution locks.
#[derive(Default)]
struct PlanLocks {
    locks: Mutex<HashMap<i32, Arc<tokio::sync::Mutex<()>>>>,
}

impl PlanLocks {
    fn for_plan(&self, plan_id: i32) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("plan lock registry poisoned");
        locks.entry(plan_id).or_default().clone()
    }
}

/// Sequences multi-case plan runs.
pub struct PlanRunner {
    store: Arc<dyn ExecutionStore>,
    executor: Arc<CaseExecutor>,
    locks: PlanLocks,
}

impl PlanRunner {
    pub fn new(store: Arc<dyn ExecutionStore>, executor: Arc<CaseExecutor>) -> Self {
        PlanRunner {
            store,
            executor,
            locks: PlanLocks::default(),
        }
    }

    /// Execute every case referenced by the plan, strictly in order, under
    /// the next run number. A single case failure never aborts the batch.
    pub async fn execute_plan(
        &self,
        plan_id: i32,
        executed_by: Option<&str>,
    ) -> AppResult<PlanRunSummary> {
        let plan = self
            .store
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test plan {}", plan_id)))?;

        let case_ids = parse_case_ids(plan.test_case_ids.as_deref().unwrap_or(""));
        if case_ids.is_empty() {
            return Err(AppError::InvalidInput(
                "test plan has no valid test cases".to_string(),
            ));
        }

        // Case metadata for the summary items, looked up in bulk
        let mut distinct = case_ids.clone();
        distinct.sort_unstable();
        distinct.dedup();
        let case_map: HashMap<i32, _> = self
            .store
            .list_cases_by_ids(&distinct)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        // Serialize runs of this plan: run-number allocation and the batch
        // itself happen under the same lock
        let lock = self.locks.for_plan(plan_id);
        let _guard = lock.lock().await;

        let run_no = self.store.max_plan_run_no(plan_id).await?.unwrap_or(0) + 1;

        info!(
            plan_id,
            run_no,
            cases = case_ids.len(),
            "starting plan execution"
        );

        let mut success = 0i64;
        let mut failed = 0i64;
        let mut duration_ms = 0i64;
        let mut items = Vec::with_capacity(case_ids.len());
        let mut first_report_id = None;

        for case_id in &case_ids {
            let result = self
                .executor
                .execute(
                    *case_id,
                    executed_by,
                    Some(PlanRef {
                        plan_id,
                        run_no,
                    }),
                )
                .await?;

            if result.is_success() {
                success += 1;
            } else {
                failed += 1;
            }
            duration_ms += result.duration_ms.unwrap_or(0);
            if first_report_id.is_none() {
                first_report_id = result.report_id;
            }

            let case = case_map.get(case_id);
            items.push(PlanRunItem {
                case_id: *case_id,
                status: result.status,
                duration_ms: result.duration_ms,
                report_id: result.report_id,
                case_name: case.map(|c| c.name.clone()),
                case_type: case.map(|c| c.case_type.clone()),
            });
        }

        let total = case_ids.len() as i64;
        Ok(PlanRunSummary {
            plan_id: plan.id,
            plan_name: plan.name,
            environment: plan.environment,
            executed_by: match executed_by.map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => "System".to_string(),
            },
            run_no,
            total,
            success,
            failed,
            duration_ms,
            avg_duration_ms: if total > 0 { duration_ms / total } else { 0 },
            items,
            plan_summary_report_id: first_report_id,
        })
    }
}

/// Parse the delimited case-id list: split on comma, trim, keep positive
/// integers, skip everything else. Duplicates and order are preserved.
fn parse_case_ids(raw: &str) -> Vec<i32> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse::<i32>().ok())
        .filter(|id| *id > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExecutionResult, RunnerPayload};
    use crate::services::runner::CaseRunner;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;

    /// Runner that fails specific case ids and succeeds the rest.
    struct SelectiveRunner {
        fail_cases: Vec<i32>,
    }

    #[async_trait]
    impl CaseRunner for SelectiveRunner {
        async fn run(&self, payload: &RunnerPayload) -> ExecutionResult {
            if self.fail_cases.contains(&payload.case_id) {
                ExecutionResult {
                    status: "failed".to_string(),
                    duration_ms: Some(10),
                    error: Some("execution failed".to_string()),
                    ..Default::default()
                }
            } else {
                ExecutionResult {
                    status: "success".to_string(),
                    duration_ms: Some(10),
                    ..Default::default()
                }
            }
        }
    }

    fn plan_runner(store: Arc<MemoryStore>, fail_cases: Vec<i32>) -> PlanRunner {
        let executor = Arc::new(CaseExecutor::new(
            store.clone(),
            Arc::new(SelectiveRunner { fail_cases }),
        ));
        PlanRunner::new(store, executor)
    }

    fn seed_cases(store: &MemoryStore) {
        store.add_case(1, "one", "API", Some(r#"{"url":"http://x"}"#));
        store.add_case(2, "two", "WEB", Some("script"));
        store.add_case(3, "three", "APP", Some("script"));
    }

    #[test]
    fn test_malformed_tokens_are_skipped() {
        assert_eq!(parse_case_ids("1,2,,abc,3"), vec![1, 2, 3]);
        assert_eq!(parse_case_ids(" 4 , -1, 0, 5 "), vec![4, 5]);
        assert_eq!(parse_case_ids(""), Vec::<i32>::new());
        // duplicates and order are preserved
        assert_eq!(parse_case_ids("3,1,3"), vec![3, 1, 3]);
    }

    #[tokio::test]
    async fn test_plan_not_found() {
        let store = Arc::new(MemoryStore::new());
        let runner = plan_runner(store, vec![]);

        let err = runner.execute_plan(42, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_plan_with_no_valid_cases_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        store.add_plan(1, "empty", "abc, ,");
        let runner = plan_runner(store, vec![]);

        let err = runner.execute_plan(1, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let store = Arc::new(MemoryStore::new());
        seed_cases(&store);
        store.add_plan(1, "smoke", "1,2,3");
        let runner = plan_runner(store.clone(), vec![2]);

        let summary = runner.execute_plan(1, Some("carol")).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.duration_ms, 30);
        assert_eq!(summary.avg_duration_ms, 10);
        assert_eq!(summary.executed_by, "carol");

        // all three items present, in original order
        let ids: Vec<i32> = summary.items.iter().map(|i| i.case_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(summary.items[1].status, "failed");
        assert_eq!(summary.items[0].case_name.as_deref(), Some("one"));

        // one report per executed case
        assert_eq!(store.report_count(), 3);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_skipped_in_order() {
        let store = Arc::new(MemoryStore::new());
        seed_cases(&store);
        store.add_plan(1, "messy", "1,2,,abc,3");
        let runner = plan_runner(store.clone(), vec![]);

        let summary = runner.execute_plan(1, None).await.unwrap();
        let ids: Vec<i32> = summary.items.iter().map(|i| i.case_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_run_numbers_increase_per_plan() {
        let store = Arc::new(MemoryStore::new());
        seed_cases(&store);
        store.add_plan(1, "smoke", "1,2");
        let runner = plan_runner(store.clone(), vec![]);

        let first = runner.execute_plan(1, None).await.unwrap();
        let second = runner.execute_plan(1, None).await.unwrap();

        assert_eq!(first.run_no, 1);
        assert_eq!(second.run_no, 2);

        // reports carry the run number they were executed under
        let report = store.report(second.items[0].report_id.unwrap()).unwrap();
        assert_eq!(report.plan_id, Some(1));
        assert_eq!(report.plan_run_no, Some(2));
    }

    #[tokio::test]
    async fn test_concurrent_runs_of_same_plan_get_distinct_run_numbers() {
        let store = Arc::new(MemoryStore::new());
        seed_cases(&store);
        store.add_plan(1, "smoke", "1,2,3");
        let runner = Arc::new(plan_runner(store.clone(), vec![]));

        let (a, b) = tokio::join!(
            {
                let runner = runner.clone();
                async move { runner.execute_plan(1, None).await.unwrap() }
            },
            {
                let runner = runner.clone();
                async move { runner.execute_plan(1, None).await.unwrap() }
            }
        );

        let mut runs = vec![a.run_no, b.run_no];
        runs.sort_unstable();
        assert_eq!(runs, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_missing_case_counts_as_failure_without_report() {
        let store = Arc::new(MemoryStore::new());
        seed_cases(&store);
        store.add_plan(1, "partial", "1,99");
        let runner = plan_runner(store.clone(), vec![]);

        let summary = runner.execute_plan(1, None).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.items[1].report_id.is_none());
        assert_eq!(store.report_count(), 1);
    }
}
