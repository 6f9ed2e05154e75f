//! Environment CRUD endpoints.

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{EnvironmentDto, SaveEnvironmentRequest};

/// List all environments.
#[utoipa::path(
    get,
    path = "/api/environments",
    tag = "Environments",
    responses(
        (status = 200, description = "All environments", body = [EnvironmentDto])
    )
)]
#[get("/environments")]
pub async fn list_environments(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let environments: Vec<EnvironmentDto> = pool
        .list_environments()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(environments))
}

/// Create an environment.
#[utoipa::path(
    post,
    path = "/api/environments",
    tag = "Environments",
    request_body = SaveEnvironmentRequest,
    responses(
        (status = 200, description = "Created environment", body = EnvironmentDto)
    )
)]
#[post("/environments")]
pub async fn create_environment(
    pool: web::Data<DbPool>,
    body: web::Json<SaveEnvironmentRequest>,
) -> AppResult<HttpResponse> {
    let environment = pool.insert_environment(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(EnvironmentDto::from(environment)))
}

/// Update an environment.
#[utoipa::path(
    put,
    path = "/api/environments",
    tag = "Environments",
    request_body = SaveEnvironmentRequest,
    responses(
        (status = 200, description = "Updated environment", body = EnvironmentDto),
        (status = 404, description = "Environment not found", body = crate::error::ErrorResponse)
    )
)]
#[put("/environments")]
pub async fn update_environment(
    pool: web::Data<DbPool>,
    body: web::Json<SaveEnvironmentRequest>,
) -> AppResult<HttpResponse> {
    let environment = pool.update_environment(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(EnvironmentDto::from(environment)))
}

/// Delete an environment.
#[utoipa::path(
    delete,
    path = "/api/environments/{id}",
    tag = "Environments",
    params(("id" = i32, Path, description = "Environment id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Environment not found", body = crate::error::ErrorResponse)
    )
)]
#[delete("/environments/{id}")]
pub async fn delete_environment(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_environment(id).await? {
        return Err(AppError::NotFound(format!("Environment {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Configure environment routes.
pub fn configure_environment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_environments)
        .service(create_environment)
        .service(update_environment)
        .service(delete_environment);
}
