//! Shift history - filtering and aggregation of closed drawers.
//!
//! Drawers are filtered on `closed_at` with inclusive bounds. Relative ranges start at
//! midnight N days before today and end at 23:59:59.999 today; a custom range covers
//! whole days from `start` through `end`. Open drawers never appear in history.

use crate::{
    core::{
        money::round_cents,
        sale::{self, PaymentMethod, SaleRecord},
    },
    entities::{CashDrawer, cash_drawer},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Date range applied to `closed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    /// Since midnight today
    Today,
    /// Since midnight seven days ago
    Last7Days,
    /// Since midnight thirty days ago
    Last30Days,
    /// No bounds
    #[default]
    AllTime,
    /// Whole days from `start` through `end`
    Custom {
        /// First day included
        start: NaiveDate,
        /// Last day included
        end: NaiveDate,
    },
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

impl DateRange {
    /// Parses the query form: `today`, `last7days`, `last30days`, `all` or `custom`.
    /// A custom range needs both dates; supplying dates without a name implies custom.
    pub fn parse(
        range: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        let name = range.map(|r| r.trim().to_ascii_lowercase());
        match name.as_deref() {
            Some("today") => Ok(Self::Today),
            Some("last7days" | "last_7_days" | "week") => Ok(Self::Last7Days),
            Some("last30days" | "last_30_days" | "month") => Ok(Self::Last30Days),
            Some("all" | "alltime" | "all_time") => Ok(Self::AllTime),
            Some("custom") | None if start.is_some() || end.is_some() => match (start, end) {
                (Some(start), Some(end)) if start <= end => Ok(Self::Custom { start, end }),
                (Some(_), Some(_)) => Err(Error::validation("start must not be after end")),
                _ => Err(Error::validation("A custom range needs both start and end")),
            },
            Some("custom") => Err(Error::validation("A custom range needs both start and end")),
            None => Ok(Self::AllTime),
            Some(other) => Err(Error::validation(format!("Unknown date range '{other}'"))),
        }
    }

    /// Inclusive `(start, end)` bounds relative to `now`, `None` for all time.
    #[must_use]
    pub fn bounds(self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let today = now.date_naive();
        let relative = |days: i64| (start_of_day(today - Duration::days(days)), end_of_day(today));
        match self {
            Self::Today => Some(relative(0)),
            Self::Last7Days => Some(relative(7)),
            Self::Last30Days => Some(relative(30)),
            Self::AllTime => None,
            Self::Custom { start, end } => Some((start_of_day(start), end_of_day(end))),
        }
    }
}

/// Which closed shifts to report on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftFilter {
    /// Date range on `closed_at`
    pub range: DateRange,
    /// Only this employee's shifts
    pub employee_id: Option<i64>,
}

impl ShiftFilter {
    /// True when the drawer is closed, inside the range and owned by the employee.
    #[must_use]
    pub fn matches(&self, drawer: &cash_drawer::Model, now: DateTime<Utc>) -> bool {
        let Some(closed_at) = drawer.closed_at else {
            return false;
        };
        if self.employee_id.is_some_and(|id| id != drawer.employee_id) {
            return false;
        }
        self.range
            .bounds(now)
            .is_none_or(|(start, end)| closed_at >= start && closed_at <= end)
    }
}

/// Sales statistics of one shift, from its completed transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStats {
    /// Σ total amount
    pub total_sales: f64,
    /// Σ cash legs
    pub cash_sales: f64,
    /// Σ credit and debit card legs
    pub card_sales: f64,
    /// Σ `GCash` and `PayMaya` legs
    pub mobile_sales: f64,
    /// Σ tips
    pub total_tips: f64,
    /// Number of completed transactions
    pub order_count: usize,
}

impl ShiftStats {
    /// Computes the statistics of a set of sales; non-completed sales are skipped.
    #[must_use]
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a SaleRecord>) -> Self {
        let mut stats = Self::default();
        for sale in sales.into_iter().filter(|s| s.is_completed()) {
            stats.total_sales += sale.transaction.total_amount;
            stats.cash_sales += sale.cash_amount();
            stats.card_sales += sale.leg_total(PaymentMethod::is_card);
            stats.mobile_sales += sale.leg_total(PaymentMethod::is_mobile);
            stats.total_tips += sale.transaction.tip;
            stats.order_count += 1;
        }
        stats.rounded()
    }

    fn rounded(self) -> Self {
        Self {
            total_sales: round_cents(self.total_sales),
            cash_sales: round_cents(self.cash_sales),
            card_sales: round_cents(self.card_sales),
            mobile_sales: round_cents(self.mobile_sales),
            total_tips: round_cents(self.total_tips),
            order_count: self.order_count,
        }
    }
}

/// One closed shift with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    /// The closed drawer
    #[serde(flatten)]
    pub drawer: cash_drawer::Model,
    /// Its sales statistics
    pub stats: ShiftStats,
}

/// Sums over a set of shifts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Number of shifts
    pub shift_count: usize,
    /// Σ per-shift statistics
    #[serde(flatten)]
    pub stats: ShiftStats,
    /// Σ drawer difference
    pub total_difference: f64,
    /// True when `total_difference` is negative
    pub net_shortage: bool,
}

impl HistorySummary {
    /// Aggregates per-shift reports.
    #[must_use]
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a ShiftReport>) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.shift_count += 1;
            summary.stats.total_sales += report.stats.total_sales;
            summary.stats.cash_sales += report.stats.cash_sales;
            summary.stats.card_sales += report.stats.card_sales;
            summary.stats.mobile_sales += report.stats.mobile_sales;
            summary.stats.total_tips += report.stats.total_tips;
            summary.stats.order_count += report.stats.order_count;
            summary.total_difference += report.drawer.difference.unwrap_or(0.0);
        }
        summary.stats = summary.stats.rounded();
        summary.total_difference = round_cents(summary.total_difference);
        summary.net_shortage = summary.total_difference < 0.0;
        summary
    }
}

/// Filtered shifts with overall and per-employee summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftHistory {
    /// Matching shifts, most recently closed first
    pub shifts: Vec<ShiftReport>,
    /// Totals across all matching shifts
    pub summary: HistorySummary,
    /// Totals per employee id
    pub by_employee: BTreeMap<i64, HistorySummary>,
}

impl ShiftHistory {
    /// Builds reports for the drawers matching `filter` from pre-loaded sales.
    #[must_use]
    pub fn build(
        drawers: Vec<cash_drawer::Model>,
        sales: &[SaleRecord],
        filter: &ShiftFilter,
        now: DateTime<Utc>,
    ) -> Self {
        let mut sales_by_drawer: HashMap<i64, Vec<&SaleRecord>> = HashMap::new();
        for sale in sales {
            if let Some(drawer_id) = sale.transaction.drawer_id {
                sales_by_drawer.entry(drawer_id).or_default().push(sale);
            }
        }

        let shifts: Vec<ShiftReport> = drawers
            .into_iter()
            .filter(|d| filter.matches(d, now))
            .map(|drawer| {
                let stats = ShiftStats::from_sales(
                    sales_by_drawer.get(&drawer.id).into_iter().flatten().copied(),
                );
                ShiftReport { drawer, stats }
            })
            .collect();

        let mut grouped: BTreeMap<i64, Vec<&ShiftReport>> = BTreeMap::new();
        for report in &shifts {
            grouped.entry(report.drawer.employee_id).or_default().push(report);
        }
        let by_employee = grouped
            .into_iter()
            .map(|(employee_id, reports)| (employee_id, HistorySummary::from_reports(reports)))
            .collect();

        Self {
            summary: HistorySummary::from_reports(&shifts),
            shifts,
            by_employee,
        }
    }
}

/// Loads closed drawers and their sales and builds the history for `filter`.
pub async fn shift_history(
    db: &DatabaseConnection,
    filter: ShiftFilter,
    now: DateTime<Utc>,
) -> Result<ShiftHistory> {
    let mut query = CashDrawer::find().filter(cash_drawer::Column::ClosedAt.is_not_null());
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(cash_drawer::Column::EmployeeId.eq(employee_id));
    }
    let drawers: Vec<cash_drawer::Model> = query
        .order_by_desc(cash_drawer::Column::ClosedAt)
        .order_by_desc(cash_drawer::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .filter(|d| filter.matches(d, now))
        .collect();

    let ids: Vec<i64> = drawers.iter().map(|d| d.id).collect();
    let sales = sale::load_sales_for_drawers(db, &ids).await?;

    Ok(ShiftHistory::build(drawers, &sales, &filter, now))
}
