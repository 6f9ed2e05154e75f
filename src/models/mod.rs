//! Domain models and DTOs for the TestOps platform.

use utoipa::ToSchema;

pub mod case;
pub mod dashboard;
pub mod environment;
pub mod execution;
pub mod plan;
pub mod probe;
pub mod report;
pub mod user;

// Re-export commonly used types
pub use case::{CaseType, ListCasesQuery, SaveTestCaseRequest, TestCaseDto};
pub use dashboard::{DailyTrend, DashboardStats, RecentActivity};
pub use environment::{EnvironmentDto, SaveEnvironmentRequest};
pub use execution::{ExecutionResult, RunnerPayload};
pub use plan::{PlanRunItem, PlanRunSummary, SaveTestPlanRequest, TestPlanDto};
pub use probe::{ApiProbeRequest, ApiProbeResponse, ProbeParam};
pub use report::{CreateReportRequest, ListReportsQuery, NewReport, ReportDto};
pub use user::{LoginRequest, RegisterRequest, UserDto};

/// Pagination parameters.
#[derive(Debug, Clone, serde::Deserialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    10
}

impl PaginationParams {
    /// Calculate the offset for database queries.
    pub fn offset(&self) -> u64 {
        (self.page().saturating_sub(1)) * self.clamped_size()
    }

    /// Current page, 1-based.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(default_page()).max(1)
    }

    /// Clamp page size to maximum allowed value.
    pub fn clamped_size(&self) -> u64 {
        self.size.unwrap_or(default_size()).clamp(1, 100)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, serde::Serialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u64, size: u64, total: u64) -> Self {
        let total_pages = if total == 0 { 0 } else { total.div_ceil(size) };

        Pagination {
            page,
            size,
            total,
            total_pages,
        }
    }
}
