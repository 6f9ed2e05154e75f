//! Test plan models and DTOs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::test_plan;

/// Test plan view returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestPlanDto {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case_ids: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<test_plan::Model> for TestPlanDto {
    fn from(m: test_plan::Model) -> Self {
        TestPlanDto {
            id: m.id,
            name: m.name,
            description: m.description,
            environment: m.environment,
            test_case_ids: m.test_case_ids,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for creating or updating a test plan.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTestPlanRequest {
    /// Present on update, absent on create.
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub test_case_ids: Option<String>,
    #[serde(default)]
    pub created_by: Option<i32>,
}

/// Per-case entry in a plan run summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanRunItem {
    pub case_id: i32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
}

/// Ephemeral result of one plan execution. Not persisted as its own entity;
/// only the constituent reports are.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanRunSummary {
    pub plan_id: i32,
    pub plan_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub executed_by: String,
    pub run_no: i32,
    pub total: i64,
    pub success: i64,
    pub failed: i64,
    pub duration_ms: i64,
    pub avg_duration_ms: i64,
    pub items: Vec<PlanRunItem>,
    /// Report id of the first item that produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_summary_report_id: Option<i32>,
}
