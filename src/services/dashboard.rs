//! Dashboard aggregation over the accumulated report history.
//!
//! Read-only: recomputed from current store state on every request, never
//! cached, and safe to run concurrently with ongoing executions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime};

use crate::error::AppResult;
use crate::models::{CaseType, DailyTrend, DashboardStats, RecentActivity};
use crate::store::ExecutionStore;

const TREND_DAYS: i64 = 7;
const RECENT_LIMIT: u64 = 10;
const DATE_KEY: &str = "%m-%d";

/// Computes time-bucketed execution statistics.
pub struct DashboardAggregator {
    store: Arc<dyn ExecutionStore>,
}

impl DashboardAggregator {
    pub fn new(store: Arc<dyn ExecutionStore>) -> Self {
        DashboardAggregator { store }
    }

    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        let now = Local::now().naive_local();

        let total_cases = self.store.count_cases().await?;
        let passed_cases = self.store.count_cases_by_last_result("success").await?;
        let failed_cases = self.store.count_cases_by_last_result("failed").await?;
        let total_executions = self.store.count_reports().await?;
        let avg_duration = self
            .store
            .avg_execution_time()
            .await?
            .map(round2)
            .unwrap_or(0.0);

        let daily_trend = self.daily_trend(now).await?;
        let recent_activity = self.recent_activity(now).await?;

        Ok(DashboardStats {
            total_cases,
            passed_cases,
            failed_cases,
            total_executions,
            avg_duration,
            daily_trend,
            recent_activity,
        })
    }

    /// Fixed 7-day window ending today, every day pre-seeded so the output
    /// always has exactly 7 entries.
    async fn daily_trend(&self, now: NaiveDateTime) -> AppResult<Vec<DailyTrend>> {
        let start_day = now.date() - Duration::days(TREND_DAYS - 1);
        let window_start = start_day.and_hms_opt(0, 0, 0).expect("midnight is valid");

        let reports = self.store.reports_since(window_start).await?;

        // Joined case metadata for per-type buckets; reports whose case was
        // deleted simply carry no type
        let case_ids: Vec<i32> = {
            let mut ids: Vec<i32> = reports.iter().map(|r| r.case_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let type_by_case: HashMap<i32, CaseType> = self
            .store
            .list_cases_by_ids(&case_ids)
            .await?
            .into_iter()
            .filter_map(|c| CaseType::parse(&c.case_type).map(|t| (c.id, t)))
            .collect();

        let mut trend: Vec<DailyTrend> = (0..TREND_DAYS)
            .map(|i| DailyTrend::empty((start_day + Duration::days(i)).format(DATE_KEY).to_string()))
            .collect();
        let index_by_date: HashMap<String, usize> = trend
            .iter()
            .enumerate()
            .map(|(i, d)| (d.date.clone(), i))
            .collect();

        // (date, type) -> (total, passed)
        let mut per_type: HashMap<(String, CaseType), (i64, i64)> = HashMap::new();

        for report in &reports {
            let date_key = report.executed_at.format(DATE_KEY).to_string();
            let Some(&index) = index_by_date.get(&date_key) else {
                continue;
            };

            let passed = report.status.eq_ignore_ascii_case("success");
            if passed {
                trend[index].passed += 1;
            } else {
                trend[index].failed += 1;
            }

            if let Some(&case_type) = type_by_case.get(&report.case_id) {
                let counters = per_type.entry((date_key, case_type)).or_insert((0, 0));
                counters.0 += 1;
                if passed {
                    counters.1 += 1;
                }
            }
        }

        for day in &mut trend {
            for case_type in [CaseType::Api, CaseType::Web, CaseType::App] {
                let (total, passed) = per_type
                    .get(&(day.date.clone(), case_type))
                    .copied()
                    .unwrap_or((0, 0));
                let rate = pass_rate(passed, total);
                match case_type {
                    CaseType::Api => {
                        day.api_count = total;
                        day.api_pass_rate = rate;
                    }
                    CaseType::Web => {
                        day.web_count = total;
                        day.web_pass_rate = rate;
                    }
                    CaseType::App => {
                        day.app_count = total;
                        day.app_pass_rate = rate;
                    }
                }
            }
        }

        Ok(trend)
    }

    /// The 10 most recent executions with joined case names and coarse
    /// relative timestamps.
    async fn recent_activity(&self, now: NaiveDateTime) -> AppResult<Vec<RecentActivity>> {
        let recent = self.store.recent_reports(RECENT_LIMIT).await?;

        let case_ids: Vec<i32> = {
            let mut ids: Vec<i32> = recent.iter().map(|r| r.case_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let name_by_case: HashMap<i32, String> = self
            .store
            .list_cases_by_ids(&case_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(recent
            .into_iter()
            .map(|report| RecentActivity {
                case_name: name_by_case
                    .get(&report.case_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Unknown Case (ID:{})", report.case_id)),
                status: report.status,
                executed_by: report.executed_by,
                time_ago: format_time_ago(report.executed_at, now),
            })
            .collect())
    }
}

/// Percent with 2-decimal precision; 0 for empty buckets.
fn pass_rate(passed: i64, total: i64) -> f64 {
    if total > 0 {
        round2(passed as f64 * 100.0 / total as f64)
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coarse relative time label, values rounded down.
fn format_time_ago(executed_at: NaiveDateTime, now: NaiveDateTime) -> String {
    let seconds = (now - executed_at).num_seconds();
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        format!("{} days ago", seconds / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn aggregator(store: Arc<MemoryStore>) -> DashboardAggregator {
        DashboardAggregator::new(store)
    }

    #[tokio::test]
    async fn test_trend_has_seven_entries_with_no_reports() {
        let store = Arc::new(MemoryStore::new());
        let stats = aggregator(store).get_stats().await.unwrap();

        assert_eq!(stats.daily_trend.len(), 7);
        assert!(stats.daily_trend.iter().all(|d| d.passed == 0 && d.failed == 0));
        assert_eq!(stats.total_executions, 0);
        assert_eq!(stats.avg_duration, 0.0);
        assert!(stats.recent_activity.is_empty());
    }

    #[tokio::test]
    async fn test_reports_bucket_by_day_and_status() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(1, "api one", "API", None);
        let now = Local::now().naive_local();

        store.add_report(1, "success", Some(100), now);
        store.add_report(1, "SUCCESS", Some(200), now);
        store.add_report(1, "failed", Some(300), now);
        store.add_report(1, "success", Some(400), now - Duration::days(1));

        let stats = aggregator(store).get_stats().await.unwrap();

        let today = &stats.daily_trend[6];
        assert_eq!(today.passed, 2);
        assert_eq!(today.failed, 1);
        assert_eq!(today.api_count, 3);
        assert_eq!(today.api_pass_rate, 66.67);
        assert_eq!(today.web_count, 0);
        assert_eq!(today.web_pass_rate, 0.0);

        let yesterday = &stats.daily_trend[5];
        assert_eq!(yesterday.passed, 1);
        assert_eq!(yesterday.api_pass_rate, 100.0);

        assert_eq!(stats.total_executions, 4);
        assert_eq!(stats.avg_duration, 250.0);
    }

    #[tokio::test]
    async fn test_reports_outside_window_are_ignored_in_trend() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(1, "old", "WEB", None);
        let now = Local::now().naive_local();
        store.add_report(1, "success", Some(10), now - Duration::days(30));

        let stats = aggregator(store).get_stats().await.unwrap();
        assert_eq!(stats.daily_trend.len(), 7);
        assert!(stats.daily_trend.iter().all(|d| d.passed == 0));
        // still counted in totals
        assert_eq!(stats.total_executions, 1);
    }

    #[tokio::test]
    async fn test_recent_activity_caps_at_ten_and_falls_back_on_missing_case() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(1, "known", "API", None);
        let now = Local::now().naive_local();

        for i in 0..12 {
            store.add_report(1, "success", Some(10), now - Duration::minutes(i));
        }
        store.add_report(999, "failed", None, now + Duration::seconds(1));

        let stats = aggregator(store).get_stats().await.unwrap();
        assert_eq!(stats.recent_activity.len(), 10);

        let newest = &stats.recent_activity[0];
        assert_eq!(newest.case_name, "Unknown Case (ID:999)");
        assert_eq!(newest.executed_by, "System");
    }

    #[tokio::test]
    async fn test_case_counters_follow_last_result() {
        let store = Arc::new(MemoryStore::new());
        store.add_case(1, "a", "API", None);
        store.add_case(2, "b", "WEB", None);
        store.add_case(3, "c", "APP", None);
        let now = Local::now().naive_local();
        store
            .mark_case_executed(1, now, "success")
            .await
            .unwrap();
        store.mark_case_executed(2, now, "failed").await.unwrap();

        let stats = aggregator(store).get_stats().await.unwrap();
        assert_eq!(stats.total_cases, 3);
        assert_eq!(stats.passed_cases, 1);
        assert_eq!(stats.failed_cases, 1);
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Local::now().naive_local();
        let ago = |secs: i64| format_time_ago(now - Duration::seconds(secs), now);

        assert_eq!(ago(5), "just now");
        assert_eq!(ago(59), "just now");
        assert_eq!(ago(60), "1 minutes ago");
        assert_eq!(ago(3 * 60 + 30), "3 minutes ago");
        assert_eq!(ago(3600), "1 hours ago");
        assert_eq!(ago(5 * 3600 + 100), "5 hours ago");
        assert_eq!(ago(86400), "1 days ago");
        assert_eq!(ago(3 * 86400), "3 days ago");
    }

    #[test]
    fn test_pass_rate_of_empty_bucket_is_zero() {
        assert_eq!(pass_rate(0, 0), 0.0);
        assert_eq!(pass_rate(2, 3), 66.67);
        assert_eq!(pass_rate(3, 3), 100.0);
    }
}
