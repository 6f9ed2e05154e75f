//! API endpoint modules.

pub mod auth;
pub mod dashboard;
pub mod environments;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod test_cases;
pub mod test_plans;

pub use auth::configure_auth_routes;
pub use dashboard::configure_dashboard_routes;
pub use environments::configure_environment_routes;
pub use health::configure_health_routes;
pub use reports::configure_report_routes;
pub use test_cases::configure_test_case_routes;
pub use test_plans::configure_test_plan_routes;

use actix_web::HttpRequest;

use crate::config::USER_NAME_HEADER;

/// Caller name from the `X-User-Name` header, if present.
pub(crate) fn caller_name(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
