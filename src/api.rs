// src/api.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

use crate::model::{
    AggregateEntry, Employee, Granularity, RawEntry, VacationAllocation, VacationRequest, Year,
};

// --- Error Types ---

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed")]
    Request(#[from] reqwest::Error),

    #[error("JSON processing error")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error")]
    UrlParse(#[from] url::ParseError),

    #[error("API token not available")]
    MissingToken,

    #[error("Backend API error: Status={status}, Message='{message}'")]
    Api { status: StatusCode, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// --- Collaborator Interfaces ---

/// The time-tracking/vacation backend as seen by the core. Implemented by
/// `WorktimeApiClient` in production and by mocks in tests.
#[async_trait]
pub trait TimeEntrySource: Send + Sync {
    /// Daily raw entries for one person, bounded by the given dates.
    async fn list_daily_entries(
        &self,
        person_id: &str,
        after: NaiveDate,
        before: NaiveDate,
    ) -> Result<Vec<RawEntry>, ApiError>;

    /// Pre-aggregated totals for one person at the given granularity.
    async fn list_person_total_time(
        &self,
        person_id: &str,
        granularity: Granularity,
    ) -> Result<Vec<AggregateEntry>, ApiError>;

    /// All employees, for the management overview.
    async fn list_employees(&self) -> Result<Vec<Employee>, ApiError>;

    /// One person's vacation-day allocation for a year.
    async fn vacation_allocation(
        &self,
        person_id: &str,
        year: Year,
    ) -> Result<VacationAllocation, ApiError>;

    /// One person's vacation requests, any status.
    async fn list_vacation_requests(
        &self,
        person_id: &str,
    ) -> Result<Vec<VacationRequest>, ApiError>;

    /// Submits a new vacation request; returns it in Pending state.
    async fn submit_vacation_request(
        &self,
        person_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<VacationRequest, ApiError>;

    /// Approves or declines a pending vacation request.
    async fn resolve_vacation_request(
        &self,
        request_id: &str,
        approve: bool,
    ) -> Result<VacationRequest, ApiError>;
}

/// Fire-and-forget sink for user-facing error messages. The core never
/// consumes a return value from it.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report_error(&self, user_message: &str, cause: Option<String>);
}
