//! Test report models and DTOs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::test_report;

/// Report view returned by the API. The case/plan fields are joined in from
/// case and plan metadata at query time; they are not stored on the row.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_run_no: Option<i32>,
    pub case_id: i32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    pub executed_at: NaiveDateTime,
    pub executed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl From<test_report::Model> for ReportDto {
    fn from(m: test_report::Model) -> Self {
        ReportDto {
            id: m.id,
            plan_id: m.plan_id,
            plan_run_no: m.plan_run_no,
            case_id: m.case_id,
            status: m.status,
            execution_time: m.execution_time,
            logs: m.logs,
            executed_at: m.executed_at,
            executed_by: m.executed_by,
            case_name: None,
            case_type: None,
            plan_name: None,
            environment: None,
        }
    }
}

/// Fields for inserting a new report row. Ids and `executed_at` defaults are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub plan_id: Option<i32>,
    pub plan_run_no: Option<i32>,
    pub case_id: i32,
    pub status: String,
    pub execution_time: Option<i32>,
    pub logs: Option<String>,
    pub executed_at: NaiveDateTime,
    pub executed_by: String,
}

/// Request body for manually creating a report. Reports are normally created
/// by the execution engine; this exists for imports and tooling.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[serde(default)]
    pub plan_id: Option<i32>,
    #[serde(default)]
    pub plan_run_no: Option<i32>,
    pub case_id: i32,
    pub status: String,
    #[serde(default)]
    pub execution_time: Option<i32>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub executed_by: Option<String>,
}

/// Query parameters for listing reports.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    /// Status filter; "all" disables it.
    #[serde(default)]
    pub status: Option<String>,
    /// Substring match against logs.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Calendar date (YYYY-MM-DD) the report was executed on.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub plan_id: Option<i32>,
    #[serde(default)]
    pub plan_run_no: Option<i32>,
}
