//! Single-case execution: builds the runner payload, dispatches, persists
//! the report and updates the case row.
//!
//! Every failure mode past the not-found check degrades to a `failed`
//! outcome that is still recorded as a report; execution never throws a
//! probe or runner failure past this boundary. Only store errors propagate.

use std::sync::Arc;

use chrono::Local;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::entity::test_case;
use crate::error::AppResult;
use crate::models::{CaseType, ExecutionResult, NewReport, RunnerPayload};
use crate::store::ExecutionStore;

use super::runner::CaseRunner;

/// Identifies the plan run a case execution belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PlanRef {
    pub plan_id: i32,
    pub run_no: i32,
}

/// Orchestrates one case execution end to end.
pub struct CaseExecutor {
    store: Arc<dyn ExecutionStore>,
    runner: Arc<dyn CaseRunner>,
}

impl CaseExecutor {
    pub fn new(store: Arc<dyn ExecutionStore>, runner: Arc<dyn CaseRunner>) -> Self {
        CaseExecutor { store, runner }
    }

    /// Execute a stored case and record the attempt.
    ///
    /// A missing case short-circuits before any report is written; every
    /// other path produces exactly one report.
    pub async fn execute(
        &self,
        case_id: i32,
        executed_by: Option<&str>,
        plan: Option<PlanRef>,
    ) -> AppResult<ExecutionResult> {
        let Some(case) = self.store.get_case(case_id).await? else {
            return Ok(ExecutionResult::failed("case not found"));
        };

        let outcome = self.run_case(&case).await;
        self.record(&case, outcome, executed_by, plan).await
    }

    async fn run_case(&self, case: &test_case::Model) -> ExecutionResult {
        let Some(case_type) = CaseType::parse(&case.case_type) else {
            return ExecutionResult::failed(format!("unsupported case type: {}", case.case_type));
        };

        let payload = RunnerPayload {
            case_id: case.id,
            case_type: case_type.as_str().to_string(),
            environment: case.environment.clone(),
            content: build_content(case.content.as_deref(), case_type),
        };

        debug!(case_id = case.id, case_type = %case_type, "dispatching case to runner");

        // All three case types speak the same payload contract; the driver
        // script dispatches on the type tag.
        let runner = match case_type {
            CaseType::Api | CaseType::Web | CaseType::App => &self.runner,
        };

        runner.run(&payload).await
    }

    /// Persist the outcome: case last-run/last-result plus one report row.
    async fn record(
        &self,
        case: &test_case::Model,
        mut outcome: ExecutionResult,
        executed_by: Option<&str>,
        plan: Option<PlanRef>,
    ) -> AppResult<ExecutionResult> {
        let now = Local::now().naive_local();
        let success = outcome.is_success();
        let status = if success { "success" } else { "failed" };

        if !success {
            warn!(
                case_id = case.id,
                error = outcome.error.as_deref().unwrap_or(""),
                "case execution failed"
            );
        }

        self.store.mark_case_executed(case.id, now, status).await?;

        let report = self
            .store
            .insert_report(NewReport {
                plan_id: plan.map(|p| p.plan_id),
                plan_run_no: plan.map(|p| p.run_no).filter(|n| *n > 0),
                case_id: case.id,
                status: status.to_string(),
                execution_time: outcome.duration_ms.map(|d| d as i32),
                logs: build_logs(&outcome),
                executed_at: now,
                executed_by: normalize_executed_by(executed_by),
            })
            .await?;

        outcome.report_id = Some(report.id);
        Ok(outcome)
    }
}

/// Report logs: outcome logs with the error message appended on a new line
/// when present.
fn build_logs(outcome: &ExecutionResult) -> Option<String> {
    let logs = outcome
        .logs
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    let error = outcome
        .error
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    match (logs, error) {
        (Some(logs), Some(error)) => Some(format!("{}\n{}", logs, error)),
        (Some(logs), None) => Some(logs.to_string()),
        (None, Some(error)) => Some(error.to_string()),
        (None, None) => None,
    }
}

/// Trimmed caller name, defaulting to "System".
fn normalize_executed_by(executed_by: Option<&str>) -> String {
    match executed_by.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "System".to_string(),
    }
}

/// Parse stored case content into the mapping handed to runners.
///
/// Non-JSON content becomes `{"script": <raw>}` so downstream runners always
/// receive a mapping, never a bare string. For API cases a string `body`
/// field that looks like JSON is promoted to a nested structure, letting API
/// cases store raw or JSON bodies interchangeably.
fn build_content(raw: Option<&str>, case_type: CaseType) -> JsonValue {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return JsonValue::Object(Map::new());
    }

    match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::Object(mut map)) => {
            if case_type == CaseType::Api {
                promote_json_body(&mut map);
            }
            JsonValue::Object(map)
        }
        _ => {
            let mut map = Map::new();
            map.insert("script".to_string(), JsonValue::String(raw.to_string()));
            JsonValue::Object(map)
        }
    }
}

fn promote_json_body(map: &mut Map<String, JsonValue>) {
    let body = match map.get("body") {
        Some(JsonValue::String(body)) => body.trim().to_string(),
        _ => return,
    };

    if (body.starts_with('{') || body.starts_with('['))
        && let Ok(parsed) = serde_json::from_str::<JsonValue>(&body)
    {
        map.insert("body".to_string(), parsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted runner capturing the payloads it receives.
    struct FakeRunner {
        results: Mutex<Vec<ExecutionResult>>,
        payloads: Mutex<Vec<RunnerPayload>>,
    }

    impl FakeRunner {
        fn returning(results: Vec<ExecutionResult>) -> Arc<Self> {
            Arc::new(FakeRunner {
                results: Mutex::new(results),
                payloads: Mutex::new(Vec::new()),
            })
        }

        fn success(duration_ms: i64) -> ExecutionResult {
            ExecutionResult {
                status: "success".to_string(),
                duration_ms: Some(duration_ms),
                logs: Some("ran".to_string()),
                ..Default::default()
            }
        }

        fn last_payload(&self) -> RunnerPayload {
            self.payloads.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CaseRunner for FakeRunner {
        async fn run(&self, payload: &RunnerPayload) -> ExecutionResult {
            self.payloads.lock().unwrap().push(payload.clone());
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                FakeRunner::success(1)
            } else {
                results.remove(0)
            }
        }
    }

    fn executor(store: Arc<MemoryStore>, runner: Arc<FakeRunner>) -> CaseExecutor {
        CaseExecutor::new(store, runner)
    }

    #[tokio::test]
    async fn test_execution_creates_exactly_one_report() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(1, "login", "WEB", Some("open page"));
        let runner = FakeRunner::returning(vec![FakeRunner::success(25)]);

        let result = executor(store.clone(), runner)
            .execute(1, Some("alice"), None)
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(store.report_count(), 1);

        let report = store.report(result.report_id.unwrap()).unwrap();
        assert_eq!(report.case_id, 1);
        assert_eq!(report.status, "success");
        assert_eq!(report.execution_time, Some(25));
        assert_eq!(report.executed_by, "alice");
        assert!(report.plan_id.is_none());
    }

    #[tokio::test]
    async fn test_missing_case_short_circuits_without_report() {
        let store = Arc::new(MemoryStore::new());
        let runner = FakeRunner::returning(vec![]);

        let result = executor(store.clone(), runner)
            .execute(99, None, None)
            .await
            .unwrap();

        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("case not found"));
        assert_eq!(store.report_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_outcome_updates_last_result_and_appends_error() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(2, "checkout", "APP", Some("steps"));
        let runner = FakeRunner::returning(vec![ExecutionResult {
            status: "failed".to_string(),
            logs: Some("boom".to_string()),
            error: Some("execution failed".to_string()),
            ..Default::default()
        }]);

        let result = executor(store.clone(), runner)
            .execute(2, None, None)
            .await
            .unwrap();

        assert!(!result.is_success());
        let case = store.case(2).unwrap();
        assert_eq!(case.last_result.as_deref(), Some("failed"));
        assert!(case.last_run.is_some());

        let report = store.report(result.report_id.unwrap()).unwrap();
        assert_eq!(report.status, "failed");
        assert_eq!(report.logs.as_deref(), Some("boom\nexecution failed"));
        assert_eq!(report.executed_by, "System");
    }

    #[tokio::test]
    async fn test_plan_ref_is_recorded_on_report() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(3, "smoke", "API", Some(r#"{"url":"http://x"}"#));
        let runner = FakeRunner::returning(vec![FakeRunner::success(5)]);

        let result = executor(store.clone(), runner)
            .execute(
                3,
                Some("  bob  "),
                Some(PlanRef {
                    plan_id: 7,
                    run_no: 3,
                }),
            )
            .await
            .unwrap();

        let report = store.report(result.report_id.unwrap()).unwrap();
        assert_eq!(report.plan_id, Some(7));
        assert_eq!(report.plan_run_no, Some(3));
        assert_eq!(report.executed_by, "bob");
    }

    #[tokio::test]
    async fn test_payload_carries_parsed_content_and_type() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(4, "api case", "api", Some(r#"{"method":"POST","body":"{\"a\":1}"}"#));
        let runner = FakeRunner::returning(vec![FakeRunner::success(5)]);

        executor(store, runner.clone())
            .execute(4, None, None)
            .await
            .unwrap();

        let payload = runner.last_payload();
        assert_eq!(payload.case_type, "API");
        assert_eq!(payload.content["method"], "POST");
        // String body that looks like JSON was promoted to a structure
        assert_eq!(payload.content["body"]["a"], 1);
    }

    #[test]
    fn test_non_json_content_becomes_script_mapping() {
        let content = build_content(Some("open https://example.com"), CaseType::Web);
        assert_eq!(content["script"], "open https://example.com");
    }

    #[test]
    fn test_empty_content_is_an_empty_mapping() {
        let content = build_content(None, CaseType::Web);
        assert!(content.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_api_body_stays_raw() {
        let content = build_content(Some(r#"{"body":"{not json"}"#), CaseType::Api);
        assert_eq!(content["body"], "{not json");
    }

    #[test]
    fn test_logs_fall_back_to_error_alone() {
        let outcome = ExecutionResult::failed("spawn error");
        assert_eq!(build_logs(&outcome).as_deref(), Some("spawn error"));
    }
}
