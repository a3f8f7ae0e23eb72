// src/model.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Shared aliases for calendar identifiers.
pub type Year = i32;
pub type WeekNum = u32; // ISO week number (1-53)
pub type MonthNum = u32; // 1-12
pub type Minutes = i64;

// --- Time-Entry Wire Types ---

// One calendar day's tracked time for one person, as returned by the
// time-tracking backend. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub date: NaiveDate,
    pub expected_minutes: Minutes,
    pub logged_minutes: Minutes,
    pub project_minutes: Minutes,
    pub internal_minutes: Minutes,
    pub total_minutes: Minutes,
    #[serde(default)]
    pub vacation: bool,
}

// Composite identifier of a pre-aggregated bucket. `week` / `month` are only
// populated for the matching granularity; absence where the granularity
// requires one is malformed data, not a zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodKey {
    pub year: Year,
    #[serde(default)]
    pub week: Option<WeekNum>,
    #[serde(default)]
    pub month: Option<MonthNum>,
}

// A pre-aggregated week/month/year bucket as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateEntry {
    pub id: PeriodKey,
    pub expected_minutes: Minutes,
    pub logged_minutes: Minutes,
    pub project_minutes: Minutes,
    pub internal_minutes: Minutes,
    pub total_minutes: Minutes,
}

// --- Aggregation Output Types ---

// One labeled point along the selected scope's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTimePoint {
    pub label: String,
    pub expected_minutes: Minutes,
    pub project_minutes: Minutes,
    pub internal_minutes: Minutes,
}

// Running-total summary over all in-range points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTimeTotal {
    pub category: String,
    pub total_minutes: Minutes,
    pub logged_minutes: Minutes,
    pub expected_minutes: Minutes,
}

impl WorkTimeTotal {
    pub fn empty() -> Self {
        Self {
            category: "Total".to_string(),
            total_minutes: 0,
            logged_minutes: 0,
            expected_minutes: 0,
        }
    }
}

// The aggregation engine's full output for one scope/range selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkTimeReport {
    pub points: Vec<WorkTimePoint>,
    pub total: WorkTimeTotal,
}

// --- Vacation Types ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationDay {
    pub date: NaiveDate,
    pub week: WeekNum,
}

// All vacation days falling in one ISO week. Output order across buckets is
// most-recent-week-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationWeek {
    pub week: WeekNum,
    pub days: Vec<VacationDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationAllocation {
    pub year: Year,
    pub allocated_days: u32,
    pub used_days: u32,
    pub remaining_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequest {
    pub id: String,
    pub person_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: RequestStatus,
}

// --- People / Overview Types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

// One row of the management overview: an employee's summed yearly totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewRow {
    pub employee_id: String,
    pub name: String,
    pub logged_minutes: Minutes,
    pub expected_minutes: Minutes,
    pub balance_minutes: Minutes,
}

// --- Scope Selection ---

// Aggregation granularity selected in the dashboard. Also selects which
// range-boundary representation the controller maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Date,
    Week,
    Month,
    Year,
}

// Backend granularity for pre-aggregated totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Week => "WEEK",
            Granularity::Month => "MONTH",
            Granularity::Year => "YEAR",
        }
    }
}
