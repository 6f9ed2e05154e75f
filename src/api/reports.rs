//! Test report endpoints.
//!
//! Reports are written by the execution engine and read here; list and
//! detail responses are enriched with case and plan metadata joined in at
//! query time.

use std::collections::HashMap;

use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Local;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateReportRequest, ListReportsQuery, NewReport, Pagination, PaginationParams, ReportDto,
};

/// Report list response.
#[derive(Serialize, ToSchema)]
pub struct ReportListResponse {
    pub records: Vec<ReportDto>,
    pub pagination: Pagination,
}

/// List reports with filters, enriched with case/plan names.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("size" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("status" = Option<String>, Query, description = "Status filter; 'all' disables"),
        ("keyword" = Option<String>, Query, description = "Substring match against logs or exact id"),
        ("date" = Option<String>, Query, description = "Execution date (YYYY-MM-DD)"),
        ("planId" = Option<i32>, Query, description = "Plan filter"),
        ("planRunNo" = Option<i32>, Query, description = "Plan run filter")
    ),
    responses(
        (status = 200, description = "Paged reports", body = ReportListResponse)
    )
)]
#[get("/reports")]
pub async fn list_reports(
    pool: web::Data<DbPool>,
    query: web::Query<ListReportsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let paging = PaginationParams {
        page: query.page,
        size: query.size,
    };

    let (reports, total) = pool
        .list_reports(&query, paging.offset(), paging.clamped_size())
        .await?;

    let mut records: Vec<ReportDto> = reports.into_iter().map(ReportDto::from).collect();
    enrich(pool.get_ref(), &mut records).await?;

    Ok(HttpResponse::Ok().json(ReportListResponse {
        records,
        pagination: Pagination::new(paging.page(), paging.clamped_size(), total),
    }))
}

/// Get a report by id with case metadata.
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    tag = "Reports",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report detail", body = ReportDto),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/reports/{id}")]
pub async fn get_report(pool: web::Data<DbPool>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let report = pool
        .get_report(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {}", id)))?;

    let mut records = vec![ReportDto::from(report)];
    enrich(pool.get_ref(), &mut records).await?;
    let detail = records.remove(0);

    Ok(HttpResponse::Ok().json(detail))
}

/// Create a report row directly. Reports are normally created by the
/// engine; this exists for imports and tooling.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body = CreateReportRequest,
    responses(
        (status = 200, description = "Created report", body = ReportDto)
    )
)]
#[post("/reports")]
pub async fn create_report(
    pool: web::Data<DbPool>,
    body: web::Json<CreateReportRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let executed_by = match body.executed_by.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "System".to_string(),
    };

    let report = pool
        .insert_report(NewReport {
            plan_id: body.plan_id,
            plan_run_no: body.plan_run_no,
            case_id: body.case_id,
            status: body.status,
            execution_time: body.execution_time,
            logs: body.logs,
            executed_at: Local::now().naive_local(),
            executed_by,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ReportDto::from(report)))
}

/// Delete a report.
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    tag = "Reports",
    params(("id" = i32, Path, description = "Report id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse)
    )
)]
#[delete("/reports/{id}")]
pub async fn delete_report(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_report(id).await? {
        return Err(AppError::NotFound(format!("Report {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a batch of reports; an empty or missing body deletes all.
#[utoipa::path(
    delete,
    path = "/api/reports",
    tag = "Reports",
    request_body = Vec<i32>,
    responses((status = 204, description = "Deleted"))
)]
#[delete("/reports")]
pub async fn delete_reports(
    pool: web::Data<DbPool>,
    body: Option<web::Json<Vec<i32>>>,
) -> AppResult<HttpResponse> {
    match body {
        Some(ids) if !ids.is_empty() => {
            pool.delete_reports_by_ids(ids.as_slice()).await?;
        }
        _ => {
            pool.delete_all_reports().await?;
        }
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Fill case/plan display fields on report DTOs with bulk lookups.
async fn enrich(pool: &DbPool, records: &mut [ReportDto]) -> AppResult<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut case_ids: Vec<i32> = records.iter().map(|r| r.case_id).collect();
    case_ids.sort_unstable();
    case_ids.dedup();

    let mut plan_ids: Vec<i32> = records.iter().filter_map(|r| r.plan_id).collect();
    plan_ids.sort_unstable();
    plan_ids.dedup();

    let cases: HashMap<i32, _> = pool
        .list_cases_by_ids(&case_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let plans: HashMap<i32, _> = pool
        .list_plans_by_ids(&plan_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    for record in records.iter_mut() {
        if let Some(case) = cases.get(&record.case_id) {
            record.case_name = Some(case.name.clone());
            record.case_type = Some(case.case_type.clone());
            record.environment = case.environment.clone();
        }
        if let Some(plan) = record.plan_id.and_then(|id| plans.get(&id)) {
            record.plan_name = Some(plan.name.clone());
            if record.environment.is_none() {
                record.environment = plan.environment.clone();
            }
        }
    }

    Ok(())
}

/// Configure report routes.
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_reports)
        .service(create_report)
        .service(delete_reports)
        .service(get_report)
        .service(delete_report);
}
