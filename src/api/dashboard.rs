//! Dashboard statistics endpoint.

use actix_web::{get, web, HttpResponse};

use crate::error::AppResult;
use crate::models::DashboardStats;
use crate::services::DashboardAggregator;

/// Aggregate dashboard snapshot, recomputed on every request.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    )
)]
#[get("/dashboard/stats")]
pub async fn get_stats(aggregator: web::Data<DashboardAggregator>) -> AppResult<HttpResponse> {
    let stats = aggregator.get_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Configure dashboard routes.
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_stats_endpoint_returns_seven_day_trend() {
        let aggregator = Arc::new(DashboardAggregator::new(Arc::new(MemoryStore::new())));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(aggregator))
                .configure(configure_dashboard_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/dashboard/stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["dailyTrend"].as_array().unwrap().len(), 7);
        assert_eq!(body["totalCases"], 0);
        assert_eq!(body["avgDuration"], 0.0);
    }
}
