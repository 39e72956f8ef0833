//! # Analytics Repository
//!
//! ## Date Report
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for_date(2026-10-19)                                                  │
//! │                                                                         │
//! │   tokio::join! ─┬─ daily_analytics  business_date = date   (single)    │
//! │                 ├─ employee_shifts  shift_date = date      start asc   │
//! │                 └─ orders           created_at in [date 00:00:00,       │
//! │                                                    date 23:59:59)      │
//! │                                                                         │
//! │   each failed read ──► empty default + warn! + PartialFailure          │
//! │   no aggregate row ──► analytics: None (not a failure)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `NotInitialized` fails the whole call.

use chrono::NaiveDate;
use tracing::warn;

use dinetab_core::{
    AnalyticsFilter, DailyAnalytics, DateAnalytics, EmployeeShift, Order, PartialFailure,
    ReportPart,
};

use super::shifts::SHIFT_SELECT;
use super::{fetch_all, fetch_one, DAILY_ANALYTICS, EMPLOYEE_SHIFTS, ORDERS};
use crate::client::BackendClient;
use crate::error::{BackendError, BackendResult};
use crate::query::{Direction, Query};

/// Repository for `daily_analytics` and the per-date report.
pub struct AnalyticsRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> AnalyticsRepository<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Daily aggregates in the inclusive range, latest first.
    pub async fn daily(&self, filter: &AnalyticsFilter) -> BackendResult<Vec<DailyAnalytics>> {
        let backend = self.client.backend()?;
        let query = Query::select(DAILY_ANALYTICS, "*")
            .gte_opt("business_date", filter.start_date)
            .lte_opt("business_date", filter.end_date)
            .order("business_date", Direction::Desc);
        fetch_all(backend.as_ref(), query).await
    }

    /// Aggregate, shifts and orders of one business date.
    pub async fn for_date(&self, date: NaiveDate) -> BackendResult<DateAnalytics> {
        let backend = self.client.backend()?;
        let backend = backend.as_ref();

        let aggregate = Query::select(DAILY_ANALYTICS, "*").eq("business_date", date);
        let shifts = Query::select(EMPLOYEE_SHIFTS, SHIFT_SELECT)
            .eq("shift_date", date)
            .order("start_time", Direction::Asc);
        let orders = Query::select(ORDERS, "*")
            .gte("created_at", format!("{date}T00:00:00"))
            .lt("created_at", format!("{date}T23:59:59"))
            .order("created_at", Direction::Asc);

        let (aggregate, shifts, orders) = tokio::join!(
            fetch_one::<DailyAnalytics>(backend, aggregate),
            fetch_all::<EmployeeShift>(backend, shifts),
            fetch_all::<Order>(backend, orders),
        );

        let mut report = DateAnalytics::default();
        report.analytics = match aggregate {
            Ok(row) => Some(row),
            Err(BackendError::NotSingleRow { count: 0, .. }) => None,
            Err(e) => record(&mut report.errors, date, ReportPart::Aggregate, e),
        };
        report.shifts = match shifts {
            Ok(rows) => rows,
            Err(e) => record(&mut report.errors, date, ReportPart::Shifts, e),
        };
        report.orders = match orders {
            Ok(rows) => rows,
            Err(e) => record(&mut report.errors, date, ReportPart::Orders, e),
        };
        Ok(report)
    }
}

/// Logs a failed sub-read and hands back the empty value that replaces it.
fn record<T: Default>(
    errors: &mut Vec<PartialFailure>,
    date: NaiveDate,
    part: ReportPart,
    err: BackendError,
) -> T {
    warn!(%date, ?part, error = %err, "Date report read failed");
    errors.push(PartialFailure {
        part,
        message: err.to_string(),
    });
    T::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterOp;
    use crate::testing::client;
    use dinetab_core::Money;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_daily_range() {
        let (client, backend) = client();
        backend.respond(json!([
            {"business_date": "2026-10-19", "total_orders": 42, "total_revenue": "3150.50", "average_order_value": 75.01}
        ]));

        let filter = AnalyticsFilter {
            start_date: Some(NaiveDate::from_ymd_opt(2026, 10, 13).unwrap()),
            end_date: None,
        };
        let days = client.analytics().daily(&filter).await.unwrap();
        assert_eq!(days[0].total_orders, 42);
        assert_eq!(days[0].total_revenue, Money::from_minor(315050));

        let query = backend.last_call();
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].op, FilterOp::Gte);
        assert_eq!(query.filter_value("business_date"), Some("2026-10-13"));
        assert_eq!(query.order.unwrap().direction, Direction::Desc);
    }

    #[tokio::test]
    async fn test_for_date_issues_three_reads() {
        let (client, backend) = client();
        backend
            .respond(json!([{"business_date": "2026-10-19", "total_orders": 1, "total_revenue": 40}]))
            .respond(json!([]))
            .respond(json!([]));

        let report = client.analytics().for_date(date()).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.analytics.unwrap().total_orders, 1);

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);

        let aggregate = calls.iter().find(|q| q.collection == "daily_analytics").unwrap();
        assert!(aggregate.single);
        assert_eq!(aggregate.filter_value("business_date"), Some("2026-10-19"));

        let shifts = calls.iter().find(|q| q.collection == "employee_shifts").unwrap();
        assert_eq!(shifts.filter_value("shift_date"), Some("2026-10-19"));
        assert_eq!(shifts.order.as_ref().unwrap().column, "start_time");

        let orders = calls.iter().find(|q| q.collection == "orders").unwrap();
        let pairs = orders.query_pairs();
        assert!(pairs.contains(&("created_at".to_string(), "gte.2026-10-19T00:00:00".to_string())));
        assert!(pairs.contains(&("created_at".to_string(), "lt.2026-10-19T23:59:59".to_string())));
        assert!(pairs.contains(&("order".to_string(), "created_at.asc".to_string())));
    }

    #[tokio::test]
    async fn test_for_date_without_aggregate() {
        let (client, _backend) = client();
        let report = client.analytics().for_date(date()).await.unwrap();
        assert_eq!(report.analytics, None);
        assert!(report.shifts.is_empty());
        assert!(report.orders.is_empty());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_for_date_reports_failed_reads() {
        let (client, backend) = client();
        let denied = || BackendError::Api {
            status: 403,
            code: Some("42501".to_string()),
            message: "permission denied".to_string(),
            details: None,
            hint: None,
        };
        backend
            .fail(denied())
            .fail(BackendError::Http("connection reset".to_string()))
            .fail(denied());

        let report = client.analytics().for_date(date()).await.unwrap();
        assert_eq!(report.analytics, None);
        assert!(report.shifts.is_empty());
        assert!(report.orders.is_empty());
        assert_eq!(report.errors.len(), 3);

        let parts: Vec<ReportPart> = report.errors.iter().map(|e| e.part).collect();
        assert_eq!(
            parts,
            vec![ReportPart::Aggregate, ReportPart::Shifts, ReportPart::Orders]
        );
    }
}
