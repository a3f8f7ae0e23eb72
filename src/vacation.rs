// src/vacation.rs

use std::collections::HashSet;
use tracing::debug;

use crate::calendar;
use crate::model::{RawEntry, VacationDay, VacationWeek};

/// Groups vacation-flagged daily entries into ISO-week buckets.
///
/// The filtered days are reversed before grouping, so buckets appear in the
/// order their week number is first encountered walking backwards through
/// the input, i.e. most-recent-week-first. Each week number produces exactly
/// one bucket holding every vacation day of that week.
pub fn vacation_weeks(entries: &[RawEntry]) -> Vec<VacationWeek> {
    let reversed: Vec<VacationDay> = entries
        .iter()
        .filter(|e| e.vacation)
        .map(|e| VacationDay {
            date: e.date,
            week: calendar::iso_week_of(e.date),
        })
        .rev()
        .collect();

    let mut seen = HashSet::new();
    let mut weeks = Vec::new();
    for day in &reversed {
        if seen.insert(day.week) {
            // Full scan: a week's bucket holds all of its days, not just the
            // ones adjacent in encounter order.
            let days: Vec<VacationDay> = reversed
                .iter()
                .filter(|d| d.week == day.week)
                .cloned()
                .collect();
            weeks.push(VacationWeek {
                week: day.week,
                days,
            });
        }
    }

    debug!(
        "Grouped {} vacation days into {} week buckets",
        reversed.len(),
        weeks.len()
    );
    weeks
}
