//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TestOps Platform Server",
        version = "0.3.0",
        description = "API server for defining, executing and reporting automated API/Web/App tests"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::login,
        api::auth::register,
        // Test case endpoints
        api::test_cases::list_cases,
        api::test_cases::get_case,
        api::test_cases::create_case,
        api::test_cases::update_case,
        api::test_cases::delete_case,
        api::test_cases::delete_all_cases,
        api::test_cases::execute_adhoc,
        api::test_cases::execute_case,
        // Test plan endpoints
        api::test_plans::list_plans,
        api::test_plans::get_plan,
        api::test_plans::create_plan,
        api::test_plans::update_plan,
        api::test_plans::execute_plan,
        api::test_plans::delete_plan,
        api::test_plans::delete_all_plans,
        // Report endpoints
        api::reports::list_reports,
        api::reports::get_report,
        api::reports::create_report,
        api::reports::delete_report,
        api::reports::delete_reports,
        // Environment endpoints
        api::environments::list_environments,
        api::environments::create_environment,
        api::environments::update_environment,
        api::environments::delete_environment,
        // Dashboard endpoints
        api::dashboard::get_stats,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Pagination,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth
            models::LoginRequest,
            models::RegisterRequest,
            models::UserDto,
            // Test cases
            models::CaseType,
            models::TestCaseDto,
            models::SaveTestCaseRequest,
            api::test_cases::TestCaseListResponse,
            // Execution
            models::ProbeParam,
            models::ApiProbeRequest,
            models::ApiProbeResponse,
            models::ExecutionResult,
            // Test plans
            models::TestPlanDto,
            models::SaveTestPlanRequest,
            models::PlanRunItem,
            models::PlanRunSummary,
            api::test_plans::TestPlanListResponse,
            // Reports
            models::ReportDto,
            models::CreateReportRequest,
            api::reports::ReportListResponse,
            // Environments
            models::EnvironmentDto,
            models::SaveEnvironmentRequest,
            // Dashboard
            models::DailyTrend,
            models::RecentActivity,
            models::DashboardStats,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Login and registration"),
        (name = "Test Cases", description = "Test case management and execution"),
        (name = "Test Plans", description = "Test plan management and batch execution"),
        (name = "Reports", description = "Execution report history"),
        (name = "Environments", description = "Target environment management"),
        (name = "Dashboard", description = "Aggregated execution statistics")
    )
)]
pub struct ApiDoc;
