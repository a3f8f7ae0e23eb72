// src/lib.rs

pub mod aggregation;
pub mod api;
pub mod api_client;
pub mod calendar;
pub mod config;
pub mod controller;
pub mod model;
pub mod overview;
pub mod vacation;

mod controller_tests;

pub use aggregation::{
    aggregate_days, aggregate_months, aggregate_weeks, aggregate_years, AggregationError,
};
pub use api::{ApiError, ErrorReporter, TimeEntrySource};
pub use api_client::WorktimeApiClient;
pub use config::ApiConfig;
pub use controller::{ControllerState, WorkTimeController};
pub use model::{
    AggregateEntry, Employee, Granularity, OverviewRow, PeriodKey, RawEntry, RequestStatus, Scope,
    VacationAllocation, VacationDay, VacationRequest, VacationWeek, WorkTimePoint, WorkTimeReport,
    WorkTimeTotal,
};
pub use overview::OverviewService;
pub use vacation::vacation_weeks;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs a fmt subscriber honoring RUST_LOG. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
