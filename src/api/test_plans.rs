//! Test plan endpoints: CRUD plus batch execution.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    Pagination, PaginationParams, PlanRunSummary, SaveTestPlanRequest, TestPlanDto,
};
use crate::services::PlanRunner;

use super::caller_name;

/// Test plan list response.
#[derive(Serialize, ToSchema)]
pub struct TestPlanListResponse {
    pub records: Vec<TestPlanDto>,
    pub pagination: Pagination,
}

/// List test plans, newest first.
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Test Plans",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("size" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Paged test plans", body = TestPlanListResponse)
    )
)]
#[get("/plans")]
pub async fn list_plans(
    pool: web::Data<DbPool>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let (plans, total) = pool
        .list_plans(query.offset(), query.clamped_size())
        .await?;

    Ok(HttpResponse::Ok().json(TestPlanListResponse {
        records: plans.into_iter().map(TestPlanDto::from).collect(),
        pagination: Pagination::new(query.page(), query.clamped_size(), total),
    }))
}

/// Get a test plan by id.
#[utoipa::path(
    get,
    path = "/api/plans/{id}",
    tag = "Test Plans",
    params(("id" = i32, Path, description = "Test plan id")),
    responses(
        (status = 200, description = "Test plan", body = TestPlanDto),
        (status = 404, description = "Test plan not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/plans/{id}")]
pub async fn get_plan(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let plan = pool
        .get_plan(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test plan {}", id)))?;

    Ok(HttpResponse::Ok().json(TestPlanDto::from(plan)))
}

/// Create a test plan.
#[utoipa::path(
    post,
    path = "/api/plans",
    tag = "Test Plans",
    request_body = SaveTestPlanRequest,
    responses(
        (status = 200, description = "Created test plan", body = TestPlanDto)
    )
)]
#[post("/plans")]
pub async fn create_plan(
    pool: web::Data<DbPool>,
    body: web::Json<SaveTestPlanRequest>,
) -> AppResult<HttpResponse> {
    let plan = pool.insert_plan(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TestPlanDto::from(plan)))
}

/// Update a test plan.
#[utoipa::path(
    put,
    path = "/api/plans",
    tag = "Test Plans",
    request_body = SaveTestPlanRequest,
    responses(
        (status = 200, description = "Updated test plan", body = TestPlanDto),
        (status = 404, description = "Test plan not found", body = crate::error::ErrorResponse)
    )
)]
#[put("/plans")]
pub async fn update_plan(
    pool: web::Data<DbPool>,
    body: web::Json<SaveTestPlanRequest>,
) -> AppResult<HttpResponse> {
    let plan = pool.update_plan(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TestPlanDto::from(plan)))
}

/// Execute every case in the plan under the next run number.
#[utoipa::path(
    post,
    path = "/api/plans/{id}/execute",
    tag = "Test Plans",
    params(("id" = i32, Path, description = "Test plan id")),
    responses(
        (status = 200, description = "Plan run summary", body = PlanRunSummary),
        (status = 404, description = "Test plan not found", body = crate::error::ErrorResponse),
        (status = 400, description = "Plan has no valid cases", body = crate::error::ErrorResponse)
    )
)]
#[post("/plans/{id}/execute")]
pub async fn execute_plan(
    runner: web::Data<PlanRunner>,
    path: web::Path<i32>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let executed_by = caller_name(&req);
    let summary = runner
        .execute_plan(path.into_inner(), executed_by.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// Delete a test plan along with its reports.
#[utoipa::path(
    delete,
    path = "/api/plans/{id}",
    tag = "Test Plans",
    params(("id" = i32, Path, description = "Test plan id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Test plan not found", body = crate::error::ErrorResponse)
    )
)]
#[delete("/plans/{id}")]
pub async fn delete_plan(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_reports_for_plan(id).await?;
    if !pool.delete_plan(id).await? {
        return Err(AppError::NotFound(format!("Test plan {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Delete all test plans and every plan-linked report.
#[utoipa::path(
    delete,
    path = "/api/plans",
    tag = "Test Plans",
    responses((status = 204, description = "Deleted"))
)]
#[delete("/plans")]
pub async fn delete_all_plans(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    pool.delete_all_plan_reports().await?;
    pool.delete_all_plans().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure test plan routes.
pub fn configure_test_plan_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_plans)
        .service(execute_plan)
        .service(create_plan)
        .service(update_plan)
        .service(delete_all_plans)
        .service(get_plan)
        .service(delete_plan);
}
