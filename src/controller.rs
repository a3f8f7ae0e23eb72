// src/controller.rs

use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::aggregation::{
    aggregate_days, aggregate_months, aggregate_weeks, aggregate_years,
};
use crate::api::{ErrorReporter, TimeEntrySource};
use crate::calendar;
use crate::model::{Granularity, Scope, WeekNum, WorkTimeReport, Year};

// --- Controller State ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading,
    Ready,
    Error,
}

// Resolved inputs for one fetch+aggregate cycle. Built under the lock, used
// outside it.
#[derive(Debug, Clone, Copy)]
enum FetchPlan {
    Days { start: NaiveDate, end: NaiveDate },
    Weeks {
        year: Year,
        start_week: WeekNum,
        end_week: WeekNum,
    },
    Months { start: NaiveDate, end: NaiveDate },
    Years { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug)]
struct Inner {
    person_id: Option<String>,
    scope: Scope,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    week_year: Option<Year>,
    start_week: Option<WeekNum>,
    end_week: Option<WeekNum>,
    start_only: bool,
    state: ControllerState,
    payload: Option<WorkTimeReport>,
    generation: u64,
}

impl Inner {
    // Resolves the current selection into a fetch plan, or None when the
    // selection is still incomplete (validation gap: no fetch is attempted).
    fn plan(&self) -> Option<FetchPlan> {
        match self.scope {
            Scope::Date => {
                let start = self.start_date?;
                let end = self.effective_end()?;
                Some(FetchPlan::Days { start, end })
            }
            Scope::Week => Some(FetchPlan::Weeks {
                year: self.week_year?,
                start_week: self.start_week?,
                end_week: self.end_week?,
            }),
            Scope::Month => {
                let start = self.start_date?;
                let end = self.effective_end()?;
                Some(FetchPlan::Months { start, end })
            }
            Scope::Year => {
                let start = self.start_date?;
                let end = self.effective_end()?;
                Some(FetchPlan::Years { start, end })
            }
        }
    }

    // A cleared end boundary means "up to now". The range test excludes both
    // bounds, so tomorrow keeps today's entries in range.
    fn effective_end(&self) -> Option<NaiveDate> {
        match self.end_date {
            Some(end) if !self.start_only => Some(end),
            _ => Local::now().date_naive().succ_opt(),
        }
    }
}

/// Binds the selected person, scope and range boundaries to the matching
/// aggregation function and re-runs fetch+aggregate on every input change.
///
/// Continuously re-entrant: every state can transition back to Loading. A
/// per-cycle generation counter makes the newest cycle authoritative; results
/// of superseded cycles are dropped silently, which also covers results
/// arriving after teardown.
pub struct WorkTimeController {
    source: Arc<dyn TimeEntrySource>,
    reporter: Arc<dyn ErrorReporter>,
    credential: Option<String>,
    inner: Arc<Mutex<Inner>>,
}

impl WorkTimeController {
    pub fn new(
        source: Arc<dyn TimeEntrySource>,
        reporter: Arc<dyn ErrorReporter>,
        credential: Option<String>,
    ) -> Self {
        Self {
            source,
            reporter,
            credential,
            inner: Arc::new(Mutex::new(Inner {
                person_id: None,
                scope: Scope::Date,
                start_date: None,
                end_date: None,
                week_year: None,
                start_week: None,
                end_week: None,
                start_only: false,
                state: ControllerState::Idle,
                payload: None,
                generation: 0,
            })),
        }
    }

    // --- Input Setters (each one restarts the cycle) ---

    pub async fn set_person(&self, person_id: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.person_id = Some(person_id.to_string());
        }
        self.reload().await;
    }

    /// Switches the aggregation scope, converting the range representation
    /// when entering or leaving Week scope (date bounds to year/week pairs
    /// and back).
    pub async fn set_scope(&self, scope: Scope) {
        {
            let mut inner = self.inner.lock().await;
            if inner.scope == scope {
                return;
            }
            if scope == Scope::Week {
                if let Some(start) = inner.start_date {
                    inner.week_year = Some(start.iso_week().year());
                    inner.start_week = Some(calendar::iso_week_of(start));
                }
                if let Some(end) = inner.end_date {
                    inner.end_week = Some(calendar::iso_week_of(end));
                }
            } else if inner.scope == Scope::Week {
                if let (Some(year), Some(start_week)) = (inner.week_year, inner.start_week) {
                    inner.start_date = calendar::week_anchor(year, start_week);
                }
                if let (Some(year), Some(end_week)) = (inner.week_year, inner.end_week) {
                    inner.end_date = calendar::week_anchor(year, end_week);
                }
            }
            inner.scope = scope;
        }
        self.reload().await;
    }

    pub async fn set_start_date(&self, start: NaiveDate) {
        {
            let mut inner = self.inner.lock().await;
            inner.start_date = Some(start);
        }
        self.reload().await;
    }

    pub async fn set_end_date(&self, end: NaiveDate) {
        {
            let mut inner = self.inner.lock().await;
            inner.end_date = Some(end);
        }
        self.reload().await;
    }

    pub async fn set_week_range(&self, year: Year, start_week: WeekNum, end_week: WeekNum) {
        {
            let mut inner = self.inner.lock().await;
            inner.week_year = Some(year);
            inner.start_week = Some(start_week);
            inner.end_week = Some(end_week);
        }
        self.reload().await;
    }

    /// Start-date-only mode: clears the end boundary, signalling an
    /// open-ended range ("up to now") to the aggregation engine.
    pub async fn set_start_only(&self, start_only: bool) {
        {
            let mut inner = self.inner.lock().await;
            inner.start_only = start_only;
            if start_only {
                inner.end_date = None;
            }
        }
        self.reload().await;
    }

    // --- Observers ---

    pub async fn state(&self) -> ControllerState {
        self.inner.lock().await.state
    }

    /// Last READY payload. Preserved across errors so the dashboard can keep
    /// showing the previous chart next to the error message.
    pub async fn payload(&self) -> Option<WorkTimeReport> {
        self.inner.lock().await.payload.clone()
    }

    // --- Fetch + Aggregate Cycle ---

    pub async fn reload(&self) {
        if self.credential.is_none() {
            debug!("No credential present; skipping fetch");
            return;
        }

        let (generation, person, plan) = {
            let mut inner = self.inner.lock().await;
            let Some(person) = inner.person_id.clone() else {
                debug!("No person selected; skipping fetch");
                return;
            };
            let Some(plan) = inner.plan() else {
                debug!("Range selection incomplete; skipping fetch");
                return;
            };
            inner.generation += 1;
            inner.state = ControllerState::Loading;
            (inner.generation, person, plan)
        };

        let outcome = self.fetch_and_aggregate(&person, plan).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(
                "Discarding superseded result (generation {} < {})",
                generation, inner.generation
            );
            return;
        }
        match outcome {
            Ok(report) => {
                info!(
                    "Work-time report ready for {} ({} points)",
                    person,
                    report.points.len()
                );
                inner.payload = Some(report);
                inner.state = ControllerState::Ready;
            }
            Err((user_message, cause)) => {
                warn!("Work-time cycle failed for {}: {}", person, cause);
                inner.state = ControllerState::Error;
                drop(inner);
                self.reporter
                    .report_error(&user_message, Some(cause))
                    .await;
            }
        }
    }

    async fn fetch_and_aggregate(
        &self,
        person: &str,
        plan: FetchPlan,
    ) -> Result<WorkTimeReport, (String, String)> {
        match plan {
            FetchPlan::Days { start, end } => {
                let entries = self
                    .source
                    .list_daily_entries(person, start, end)
                    .await
                    .map_err(|e| (MSG_DAILY.to_string(), e.to_string()))?;
                aggregate_days(&entries, start, end)
                    .map_err(|e| (MSG_DAILY.to_string(), e.to_string()))
            }
            FetchPlan::Weeks {
                year,
                start_week,
                end_week,
            } => {
                let entries = self
                    .source
                    .list_person_total_time(person, Granularity::Week)
                    .await
                    .map_err(|e| (MSG_WEEKLY.to_string(), e.to_string()))?;
                aggregate_weeks(&entries, year, start_week, end_week)
                    .map_err(|e| (MSG_WEEKLY.to_string(), e.to_string()))
            }
            FetchPlan::Months { start, end } => {
                let entries = self
                    .source
                    .list_person_total_time(person, Granularity::Month)
                    .await
                    .map_err(|e| (MSG_MONTHLY.to_string(), e.to_string()))?;
                aggregate_months(&entries, start, end)
                    .map_err(|e| (MSG_MONTHLY.to_string(), e.to_string()))
            }
            FetchPlan::Years { start, end } => {
                let entries = self
                    .source
                    .list_person_total_time(person, Granularity::Year)
                    .await
                    .map_err(|e| (MSG_YEARLY.to_string(), e.to_string()))?;
                aggregate_years(&entries, start, end)
                    .map_err(|e| (MSG_YEARLY.to_string(), e.to_string()))
            }
        }
    }
}

// User-facing messages, distinguished per scope.
const MSG_DAILY: &str = "Could not load daily working times.";
const MSG_WEEKLY: &str = "Could not load weekly working times.";
const MSG_MONTHLY: &str = "Could not load monthly working times.";
const MSG_YEARLY: &str = "Could not load yearly working times.";
