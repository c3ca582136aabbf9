//! 仪表盘数据：人数统计、性别分布、本周出勤与日历活动

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use super::read_response;
use crate::errors::Result;
use crate::filters;
use crate::models::events::requests::{EventListParams, EventsOnDateParams};
use crate::models::{ApiResponse, ErrorCode};

define_service!(DashboardService);

impl DashboardService {
    pub async fn counts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(read_response("user counts", storage.count_users().await))
    }

    pub async fn students_by_sex(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(read_response(
            "student sex counts",
            storage.count_students_by_sex().await,
        ))
    }

    // 自本周一以来每个工作日的出勤人次
    pub async fn attendance_week(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        let since = week_start(Utc::now());
        Ok(read_response(
            "weekly attendance",
            storage.attendance_since(since).await,
        ))
    }

    // 某天开始的活动，可见范围与活动列表一致
    pub async fn events_on(
        &self,
        request: &HttpRequest,
        params: EventsOnDateParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let (from, to) = match day_bounds(params.date.as_deref(), Utc::now()) {
            Ok(bounds) => bounds,
            Err(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::InvalidDate,
                    "Invalid date, expected YYYY-MM-DD",
                )));
            }
        };

        let cond = filters::event_condition(&viewer, &EventListParams::default());
        Ok(read_response(
            "events",
            storage.list_events_between(cond, from, to).await,
        ))
    }
}

/// 最近一个周一 00:00 UTC（当天为周一时即当天）
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// 某个 UTC 日的 `[00:00, 次日 00:00)`，未提供日期时取 `now` 当天
pub fn day_bounds(date: Option<&str>, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let day = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => now.date_naive(),
    };
    let from = day.and_time(NaiveTime::MIN).and_utc();
    Ok((from, from + Duration::days(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_week_start_mid_week() {
        assert_eq!(week_start(at("2025-03-05T15:30:00Z")), at("2025-03-03T00:00:00Z"));
    }

    #[test]
    fn test_week_start_on_monday_and_sunday() {
        assert_eq!(week_start(at("2025-03-03T00:00:01Z")), at("2025-03-03T00:00:00Z"));
        assert_eq!(week_start(at("2025-03-09T23:59:59Z")), at("2025-03-03T00:00:00Z"));
    }

    #[test]
    fn test_day_bounds_from_param() {
        let (from, to) = day_bounds(Some("2025-03-04"), at("2030-01-01T12:00:00Z")).unwrap();
        assert_eq!(from, at("2025-03-04T00:00:00Z"));
        assert_eq!(to, at("2025-03-05T00:00:00Z"));
    }

    #[test]
    fn test_day_bounds_defaults_to_today() {
        let (from, _) = day_bounds(None, at("2025-03-04T18:00:00Z")).unwrap();
        assert_eq!(from, at("2025-03-04T00:00:00Z"));
        let (from, _) = day_bounds(Some("  "), at("2025-03-04T18:00:00Z")).unwrap();
        assert_eq!(from, at("2025-03-04T00:00:00Z"));
    }

    #[test]
    fn test_day_bounds_rejects_garbage() {
        assert!(day_bounds(Some("04/03/2025"), Utc::now()).is_err());
        assert!(day_bounds(Some("2025-02-30"), Utc::now()).is_err());
    }
}
