//! Authentication endpoints.
//!
//! Plaintext credential comparison against the users table; kept as the
//! upstream collaborator defines it, not hardened here.

use actix_web::{post, web, HttpResponse};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, RegisterRequest, UserDto};

/// Log in with username and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated user", body = UserDto),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
#[post("/auth/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let user = pool
        .find_user_by_credentials(&body.username, &body.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;

    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Created user", body = UserDto),
        (status = 400, description = "Username taken", body = crate::error::ErrorResponse)
    )
)]
#[post("/auth/register")]
pub async fn register(
    pool: web::Data<DbPool>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::InvalidInput(
            "username and password are required".to_string(),
        ));
    }

    if pool.find_user_by_username(&body.username).await?.is_some() {
        return Err(AppError::InvalidInput(format!(
            "username '{}' is already taken",
            body.username
        )));
    }

    let user = pool
        .insert_user(body.username, body.password, body.role)
        .await?;

    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

/// Configure auth routes.
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(register);
}
