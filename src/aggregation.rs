// src/aggregation.rs

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::calendar;
use crate::model::{
    AggregateEntry, Minutes, RawEntry, WeekNum, WorkTimePoint, WorkTimeReport, WorkTimeTotal, Year,
};

// --- Error Types ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("Aggregate entry for year {year} is missing a valid '{field}' in its period key")]
    MalformedData { field: &'static str, year: Year },

    #[error("Invalid {scope} range bounds")]
    InvalidRange { scope: &'static str },
}

// --- Internal Row Shape ---

// Minute fields shared by raw and aggregate entries.
#[derive(Debug, Clone, Copy)]
struct MinuteSet {
    expected: Minutes,
    logged: Minutes,
    project: Minutes,
    internal: Minutes,
    total: Minutes,
}

impl From<&RawEntry> for MinuteSet {
    fn from(e: &RawEntry) -> Self {
        Self {
            expected: e.expected_minutes,
            logged: e.logged_minutes,
            project: e.project_minutes,
            internal: e.internal_minutes,
            total: e.total_minutes,
        }
    }
}

impl From<&AggregateEntry> for MinuteSet {
    fn from(e: &AggregateEntry) -> Self {
        Self {
            expected: e.expected_minutes,
            logged: e.logged_minutes,
            project: e.project_minutes,
            internal: e.internal_minutes,
            total: e.total_minutes,
        }
    }
}

// One entry resolved to its calendar point and display label.
struct Row {
    point: NaiveDate,
    label: String,
    minutes: MinuteSet,
}

// Filter to the exclusive range, sort ascending, map to points, reduce to a
// total. Shared tail of every granularity.
fn assemble(rows: Vec<Row>, start: NaiveDate, end: NaiveDate) -> WorkTimeReport {
    let mut in_range: Vec<Row> = rows
        .into_iter()
        .filter(|row| calendar::in_range(start, end, row.point))
        .collect();
    in_range.sort_by_key(|row| row.point);

    let mut total = WorkTimeTotal::empty();
    let mut points = Vec::with_capacity(in_range.len());
    for row in in_range {
        total.total_minutes += row.minutes.total;
        total.logged_minutes += row.minutes.logged;
        total.expected_minutes += row.minutes.expected;
        points.push(WorkTimePoint {
            label: row.label,
            expected_minutes: row.minutes.expected,
            project_minutes: row.minutes.project,
            internal_minutes: row.minutes.internal,
        });
    }

    debug!(
        "Aggregated {} points in range {}..{} (total {} min)",
        points.len(),
        start,
        end,
        total.total_minutes
    );
    WorkTimeReport { points, total }
}

// --- Public Aggregation Functions ---

/// Day-scope aggregation over raw daily entries. Labels are ISO dates.
pub fn aggregate_days(
    entries: &[RawEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<WorkTimeReport, AggregationError> {
    let rows = entries
        .iter()
        .map(|e| Row {
            point: e.date,
            label: e.date.format("%Y-%m-%d").to_string(),
            minutes: e.into(),
        })
        .collect();
    Ok(assemble(rows, start, end))
}

/// Week-scope aggregation over pre-aggregated weekly entries. The range is a
/// year plus two ISO week numbers. An entry without a week number in its
/// period key fails the whole aggregation.
pub fn aggregate_weeks(
    entries: &[AggregateEntry],
    year: Year,
    start_week: WeekNum,
    end_week: WeekNum,
) -> Result<WorkTimeReport, AggregationError> {
    let start = calendar::week_anchor(year, start_week)
        .ok_or(AggregationError::InvalidRange { scope: "week" })?;
    let end = calendar::week_anchor(year, end_week)
        .ok_or(AggregationError::InvalidRange { scope: "week" })?;

    let rows = entries
        .iter()
        .map(|e| {
            let point = calendar::week_point(e)?;
            Ok(Row {
                point,
                label: format!("{} week {}", e.id.year, calendar::iso_week_of(point)),
                minutes: e.into(),
            })
        })
        .collect::<Result<Vec<_>, AggregationError>>()?;
    Ok(assemble(rows, start, end))
}

/// Month-scope aggregation over pre-aggregated monthly entries.
pub fn aggregate_months(
    entries: &[AggregateEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<WorkTimeReport, AggregationError> {
    let rows = entries
        .iter()
        .map(|e| {
            let point = calendar::month_point(e)?;
            Ok(Row {
                point,
                label: format!("{}-{}", e.id.year, point.month()),
                minutes: e.into(),
            })
        })
        .collect::<Result<Vec<_>, AggregationError>>()?;
    Ok(assemble(rows, start, end))
}

/// Year-scope aggregation over pre-aggregated yearly entries.
pub fn aggregate_years(
    entries: &[AggregateEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<WorkTimeReport, AggregationError> {
    let rows = entries
        .iter()
        .map(|e| {
            let point = calendar::year_point(e)?;
            Ok(Row {
                point,
                label: e.id.year.to_string(),
                minutes: e.into(),
            })
        })
        .collect::<Result<Vec<_>, AggregationError>>()?;
    Ok(assemble(rows, start, end))
}
