//! Test case models and DTOs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::test_case;

/// Test case type. Closed set: execution strategy is dispatched on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CaseType {
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "WEB")]
    Web,
    #[serde(rename = "APP")]
    App,
}

impl CaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::Web => "WEB",
            Self::App => "APP",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "API" => Some(Self::Api),
            "WEB" => Some(Self::Web),
            "APP" => Some(Self::App),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Test case view returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDto {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub case_type: String,
    pub status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<test_case::Model> for TestCaseDto {
    fn from(m: test_case::Model) -> Self {
        TestCaseDto {
            id: m.id,
            name: m.name,
            description: m.description,
            case_type: m.case_type,
            status: m.status,
            priority: m.priority,
            content: m.content,
            environment: m.environment,
            last_run: m.last_run,
            last_result: m.last_result,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for creating or updating a test case.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTestCaseRequest {
    /// Present on update, absent on create.
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub case_type: CaseType,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub created_by: Option<i32>,
}

/// Query parameters for listing test cases.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListCasesQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    /// Name substring filter.
    pub keyword: Option<String>,
    /// Exact type filter (API/WEB/APP).
    #[serde(rename = "type")]
    pub case_type: Option<String>,
    /// "created" orders by creation time, anything else by update time.
    pub sort: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_type_parse_is_case_insensitive() {
        assert_eq!(CaseType::parse("api"), Some(CaseType::Api));
        assert_eq!(CaseType::parse(" Web "), Some(CaseType::Web));
        assert_eq!(CaseType::parse("APP"), Some(CaseType::App));
        assert_eq!(CaseType::parse("cli"), None);
    }

    #[test]
    fn test_case_type_round_trip() {
        for t in [CaseType::Api, CaseType::Web, CaseType::App] {
            assert_eq!(CaseType::parse(t.as_str()), Some(t));
        }
    }
}
