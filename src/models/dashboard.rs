//! Dashboard statistics models.
//!
//! `DashboardStats` is a derived snapshot, recomputed on every request and
//! never stored.

use serde::Serialize;
use utoipa::ToSchema;

/// One day in the 7-day execution trend. Days with no activity keep zeroed
/// counters so the trend always has exactly 7 entries.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrend {
    /// Calendar day key, formatted MM-dd.
    pub date: String,
    pub passed: i64,
    pub failed: i64,
    pub api_count: i64,
    pub web_count: i64,
    pub app_count: i64,
    /// Percent, rounded to 2 decimals; 0 when the bucket is empty.
    pub api_pass_rate: f64,
    pub web_pass_rate: f64,
    pub app_pass_rate: f64,
}

impl DailyTrend {
    /// Zeroed bucket for a day.
    pub fn empty(date: String) -> Self {
        DailyTrend {
            date,
            passed: 0,
            failed: 0,
            api_count: 0,
            web_count: 0,
            app_count: 0,
            api_pass_rate: 0.0,
            web_pass_rate: 0.0,
            app_pass_rate: 0.0,
        }
    }
}

/// One row in the recent activity feed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub case_name: String,
    pub status: String,
    pub executed_by: String,
    /// Coarse relative time ("just now", "5 minutes ago", ...).
    pub time_ago: String,
}

/// Aggregate dashboard snapshot.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_cases: i64,
    pub passed_cases: i64,
    pub failed_cases: i64,
    pub total_executions: i64,
    /// Mean execution time in ms, rounded to 2 decimals; 0 with no reports.
    pub avg_duration: f64,
    pub daily_trend: Vec<DailyTrend>,
    pub recent_activity: Vec<RecentActivity>,
}
