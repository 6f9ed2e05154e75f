//! Test case endpoints: CRUD plus the two execution paths (ad-hoc probe
//! quick test and persisted-case execution).

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    ApiProbeRequest, ApiProbeResponse, ExecutionResult, ListCasesQuery, Pagination,
    PaginationParams, SaveTestCaseRequest, TestCaseDto,
};
use crate::services::{ApiProbe, CaseExecutor};

use super::caller_name;

/// Test case list response.
#[derive(Serialize, ToSchema)]
pub struct TestCaseListResponse {
    pub records: Vec<TestCaseDto>,
    pub pagination: Pagination,
}

/// List test cases with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/testcases",
    tag = "Test Cases",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("size" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("keyword" = Option<String>, Query, description = "Name substring filter"),
        ("type" = Option<String>, Query, description = "Case type filter (API/WEB/APP)"),
        ("sort" = Option<String>, Query, description = "'created' or 'updated' (default)")
    ),
    responses(
        (status = 200, description = "Paged test cases", body = TestCaseListResponse)
    )
)]
#[get("/testcases")]
pub async fn list_cases(
    pool: web::Data<DbPool>,
    query: web::Query<ListCasesQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let paging = PaginationParams {
        page: query.page,
        size: query.size,
    };

    let (cases, total) = pool
        .list_cases(&query, paging.offset(), paging.clamped_size())
        .await?;

    Ok(HttpResponse::Ok().json(TestCaseListResponse {
        records: cases.into_iter().map(TestCaseDto::from).collect(),
        pagination: Pagination::new(paging.page(), paging.clamped_size(), total),
    }))
}

/// Get a test case by id.
#[utoipa::path(
    get,
    path = "/api/testcases/{id}",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case id")),
    responses(
        (status = 200, description = "Test case", body = TestCaseDto),
        (status = 404, description = "Test case not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/testcases/{id}")]
pub async fn get_case(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let case = pool
        .get_case(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test case {}", id)))?;

    Ok(HttpResponse::Ok().json(TestCaseDto::from(case)))
}

/// Create a test case.
#[utoipa::path(
    post,
    path = "/api/testcases",
    tag = "Test Cases",
    request_body = SaveTestCaseRequest,
    responses(
        (status = 200, description = "Created test case", body = TestCaseDto)
    )
)]
#[post("/testcases")]
pub async fn create_case(
    pool: web::Data<DbPool>,
    body: web::Json<SaveTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let case = pool.insert_case(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TestCaseDto::from(case)))
}

/// Update a test case.
#[utoipa::path(
    put,
    path = "/api/testcases",
    tag = "Test Cases",
    request_body = SaveTestCaseRequest,
    responses(
        (status = 200, description = "Updated test case", body = TestCaseDto),
        (status = 404, description = "Test case not found", body = crate::error::ErrorResponse)
    )
)]
#[put("/testcases")]
pub async fn update_case(
    pool: web::Data<DbPool>,
    body: web::Json<SaveTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let case = pool.update_case(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TestCaseDto::from(case)))
}

/// Delete a test case.
#[utoipa::path(
    delete,
    path = "/api/testcases/{id}",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Test case not found", body = crate::error::ErrorResponse)
    )
)]
#[delete("/testcases/{id}")]
pub async fn delete_case(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_case(id).await? {
        return Err(AppError::NotFound(format!("Test case {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Delete all test cases.
#[utoipa::path(
    delete,
    path = "/api/testcases",
    tag = "Test Cases",
    responses((status = 204, description = "Deleted"))
)]
#[delete("/testcases")]
pub async fn delete_all_cases(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    pool.delete_all_cases().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Ad-hoc API quick test: perform one HTTP request without touching the
/// store. No report is written.
#[utoipa::path(
    post,
    path = "/api/testcases/execute",
    tag = "Test Cases",
    request_body = ApiProbeRequest,
    responses(
        (status = 200, description = "Captured HTTP exchange", body = ApiProbeResponse)
    )
)]
#[post("/testcases/execute")]
pub async fn execute_adhoc(
    probe: web::Data<ApiProbe>,
    body: web::Json<ApiProbeRequest>,
) -> AppResult<HttpResponse> {
    let response = probe.execute(&body).await;
    Ok(HttpResponse::Ok().json(response))
}

/// Execute a stored test case and record a report.
#[utoipa::path(
    post,
    path = "/api/testcases/{id}/execute",
    tag = "Test Cases",
    params(("id" = i32, Path, description = "Test case id")),
    responses(
        (status = 200, description = "Execution outcome", body = ExecutionResult)
    )
)]
#[post("/testcases/{id}/execute")]
pub async fn execute_case(
    executor: web::Data<CaseExecutor>,
    path: web::Path<i32>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let executed_by = caller_name(&req);
    let result = executor
        .execute(path.into_inner(), executed_by.as_deref(), None)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Configure test case routes.
/// Note: the literal /execute path must be registered before /{id}.
pub fn configure_test_case_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_cases)
        .service(execute_adhoc)
        .service(execute_case)
        .service(create_case)
        .service(update_case)
        .service(delete_all_cases)
        .service(get_case)
        .service(delete_case);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunnerPayload;
    use crate::services::runner::CaseRunner;
    use crate::store::memory::MemoryStore;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct AlwaysSucceeds;

    #[async_trait]
    impl CaseRunner for AlwaysSucceeds {
        async fn run(&self, _payload: &RunnerPayload) -> ExecutionResult {
            ExecutionResult {
                status: "success".to_string(),
                duration_ms: Some(3),
                ..Default::default()
            }
        }
    }

    #[actix_web::test]
    async fn test_execute_case_records_report_and_caller() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(5, "ping", "API", Some(r#"{"url":"http://x"}"#));
        let executor = Arc::new(CaseExecutor::new(store.clone(), Arc::new(AlwaysSucceeds)));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(executor))
                .service(execute_case),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/testcases/5/execute")
            .insert_header(("X-User-Name", "dana"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "success");
        let report_id = body["reportId"].as_i64().unwrap() as i32;
        let report = store.report(report_id).unwrap();
        assert_eq!(report.executed_by, "dana");
        assert_eq!(report.case_id, 5);
    }

    #[actix_web::test]
    async fn test_execute_missing_case_returns_failed_result() {
        let store = Arc::new(MemoryStore::new());
        let executor = Arc::new(CaseExecutor::new(store.clone(), Arc::new(AlwaysSucceeds)));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(executor))
                .service(execute_case),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/testcases/42/execute")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "failed");
        assert_eq!(body["error"], "case not found");
        assert_eq!(store.report_count(), 0);
    }
}
