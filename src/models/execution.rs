//! Execution payload and outcome models.
//!
//! `RunnerPayload` is the JSON object written to the external runner's stdin;
//! `ExecutionResult` is both the shape the runner prints on stdout and the
//! result returned to callers of the execution engine (augmented with the
//! persisted report id).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// JSON payload handed to a case runner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunnerPayload {
    pub case_id: i32,
    /// Canonical uppercase case type (API/WEB/APP).
    #[serde(rename = "type")]
    pub case_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Parsed case content; always a mapping, never a bare string.
    pub content: JsonValue,
}

/// Outcome of one case execution attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// "success" or "failed" (compared case-insensitively).
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Structured probe response for API cases, opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<JsonValue>,
    /// Id of the report persisted for this attempt; set by the executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<i32>,
}

impl ExecutionResult {
    /// Failed outcome carrying an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        ExecutionResult {
            status: "failed".to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Status check, case-insensitive per the wire contract.
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_output_parses_with_partial_fields() {
        let result: ExecutionResult =
            serde_json::from_str(r#"{"status":"success","durationMs":42}"#).unwrap();
        assert!(result.is_success());
        assert_eq!(result.duration_ms, Some(42));
        assert!(result.logs.is_none());
        assert!(result.report_id.is_none());
    }

    #[test]
    fn test_status_comparison_is_case_insensitive() {
        let result: ExecutionResult = serde_json::from_str(r#"{"status":"SUCCESS"}"#).unwrap();
        assert!(result.is_success());
        assert!(!ExecutionResult::failed("boom").is_success());
    }

    #[test]
    fn test_payload_serializes_with_wire_names() {
        let payload = RunnerPayload {
            case_id: 7,
            case_type: "API".to_string(),
            environment: Some("staging".to_string()),
            content: serde_json::json!({"url": "http://example.com"}),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["caseId"], 7);
        assert_eq!(value["type"], "API");
        assert_eq!(value["environment"], "staging");
    }
}
