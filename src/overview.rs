// src/overview.rs

use std::io::Write;
use std::sync::Arc;
use tracing::info;

use crate::api::{ApiError, TimeEntrySource};
use crate::model::{Granularity, OverviewRow, Year};

/// Builds the management view: one summarized row per employee.
pub struct OverviewService {
    source: Arc<dyn TimeEntrySource>,
}

impl OverviewService {
    pub fn new(source: Arc<dyn TimeEntrySource>) -> Self {
        Self { source }
    }

    /// Sums each employee's logged/expected minutes for the given year and
    /// returns the rows sorted by employee name.
    pub async fn build_overview(&self, year: Year) -> Result<Vec<OverviewRow>, ApiError> {
        info!("Building management overview for {}", year);
        let employees = self.source.list_employees().await?;

        let mut rows = Vec::with_capacity(employees.len());
        for employee in employees {
            let totals = self
                .source
                .list_person_total_time(&employee.id, Granularity::Year)
                .await?;

            let mut logged = 0;
            let mut expected = 0;
            for total in totals.iter().filter(|t| t.id.year == year) {
                logged += total.logged_minutes;
                expected += total.expected_minutes;
            }

            rows.push(OverviewRow {
                employee_id: employee.id,
                name: employee.name,
                logged_minutes: logged,
                expected_minutes: expected,
                balance_minutes: logged - expected,
            });
        }

        rows.sort_by(|a, b| a.name.cmp(&b.name));
        info!("Overview ready ({} employees)", rows.len());
        Ok(rows)
    }

    /// Writes the overview rows as CSV.
    pub fn export_csv<W: Write>(rows: &[OverviewRow], writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "employee_id",
            "name",
            "logged_minutes",
            "expected_minutes",
            "balance_minutes",
        ])?;
        for row in rows {
            csv_writer.write_record([
                row.employee_id.as_str(),
                row.name.as_str(),
                &row.logged_minutes.to_string(),
                &row.expected_minutes.to_string(),
                &row.balance_minutes.to_string(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
