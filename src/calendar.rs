// src/calendar.rs

use chrono::{Datelike, NaiveDate, Weekday};
use std::cmp::Ordering;

use crate::aggregation::AggregationError;
use crate::model::{AggregateEntry, MonthNum, WeekNum, Year};

// --- Calendar Points ---

/// ISO-8601 week number for a calendar date.
pub fn iso_week_of(date: NaiveDate) -> WeekNum {
    date.iso_week().week()
}

/// Monday of the given ISO year/week pair. `None` if the pair does not
/// describe a real week (e.g. week 54).
pub fn week_anchor(year: Year, week: WeekNum) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

/// First day of the given month (1-based).
pub fn month_anchor(year: Year, month: MonthNum) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First day of the given year.
pub fn year_anchor(year: Year) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

// --- Range Test ---

/// True iff `point` lies strictly between `start` and `end`. Both bounds are
/// exclusive: a value equal to either bound is NOT in range, so callers must
/// choose boundaries one unit outside the window they want.
pub fn in_range(start: NaiveDate, end: NaiveDate, point: NaiveDate) -> bool {
    start < point && point < end
}

// --- Period-Key Extraction ---

/// Calendar point of a week-granularity aggregate entry. Fails when the
/// composite key carries no week number.
pub fn week_point(entry: &AggregateEntry) -> Result<NaiveDate, AggregationError> {
    let week = entry.id.week.ok_or(AggregationError::MalformedData {
        field: "week",
        year: entry.id.year,
    })?;
    week_anchor(entry.id.year, week).ok_or(AggregationError::MalformedData {
        field: "week",
        year: entry.id.year,
    })
}

/// Calendar point of a month-granularity aggregate entry.
pub fn month_point(entry: &AggregateEntry) -> Result<NaiveDate, AggregationError> {
    let month = entry.id.month.ok_or(AggregationError::MalformedData {
        field: "month",
        year: entry.id.year,
    })?;
    month_anchor(entry.id.year, month).ok_or(AggregationError::MalformedData {
        field: "month",
        year: entry.id.year,
    })
}

/// Calendar point of a year-granularity aggregate entry.
pub fn year_point(entry: &AggregateEntry) -> Result<NaiveDate, AggregationError> {
    year_anchor(entry.id.year).ok_or(AggregationError::MalformedData {
        field: "year",
        year: entry.id.year,
    })
}

// --- Comparators ---

/// Three-way chronological ordering of two week-granularity entries.
pub fn compare_by_week(
    a: &AggregateEntry,
    b: &AggregateEntry,
) -> Result<Ordering, AggregationError> {
    Ok(week_point(a)?.cmp(&week_point(b)?))
}

/// Three-way chronological ordering of two month-granularity entries.
pub fn compare_by_month(
    a: &AggregateEntry,
    b: &AggregateEntry,
) -> Result<Ordering, AggregationError> {
    Ok(month_point(a)?.cmp(&month_point(b)?))
}

/// Three-way chronological ordering of two year-granularity entries.
pub fn compare_by_year(
    a: &AggregateEntry,
    b: &AggregateEntry,
) -> Result<Ordering, AggregationError> {
    Ok(year_point(a)?.cmp(&year_point(b)?))
}
