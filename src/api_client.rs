// src/api_client.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use crate::api::{ApiError, TimeEntrySource};
use crate::config::ApiConfig;
use crate::model::{
    AggregateEntry, Employee, Granularity, RawEntry, VacationAllocation, VacationRequest, Year,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitVacationRequestBody {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// Async REST client for the time-tracking/vacation backend. The credential
/// is carried opaquely; requests without one fail with `MissingToken` before
/// touching the network.
pub struct WorktimeApiClient {
    base_url: Url,
    api_token: Option<String>,
    client: Client,
}

impl WorktimeApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;

        Ok(Self {
            base_url,
            api_token: config.api_token.clone(),
            client,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_token.is_some()
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.api_token.as_deref().ok_or(ApiError::MissingToken)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("Base URL cannot have segments: {}", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!("GET {} (query: {:?})", url, query);
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token()?)
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token()?)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = body.lines().next().unwrap_or("").to_string();
            error!("Backend API error: Status={}, Message='{}'", status, message);
            return Err(ApiError::Api { status, message });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TimeEntrySource for WorktimeApiClient {
    async fn list_daily_entries(
        &self,
        person_id: &str,
        after: NaiveDate,
        before: NaiveDate,
    ) -> Result<Vec<RawEntry>, ApiError> {
        info!(
            "Fetching daily entries for {} ({}..{})",
            person_id, after, before
        );
        self.get_json(
            &format!("persons/{}/worktime", person_id),
            &[
                ("afterDate", after.to_string()),
                ("beforeDate", before.to_string()),
            ],
        )
        .await
    }

    async fn list_person_total_time(
        &self,
        person_id: &str,
        granularity: Granularity,
    ) -> Result<Vec<AggregateEntry>, ApiError> {
        info!(
            "Fetching {} totals for {}",
            granularity.as_str(),
            person_id
        );
        self.get_json(
            &format!("persons/{}/total-time", person_id),
            &[("granularity", granularity.as_str().to_string())],
        )
        .await
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        info!("Fetching all employees...");
        self.get_json("employees", &[]).await
    }

    async fn vacation_allocation(
        &self,
        person_id: &str,
        year: Year,
    ) -> Result<VacationAllocation, ApiError> {
        info!("Fetching vacation allocation for {} ({})", person_id, year);
        self.get_json(
            &format!("persons/{}/vacation-allocation", person_id),
            &[("year", year.to_string())],
        )
        .await
    }

    async fn list_vacation_requests(
        &self,
        person_id: &str,
    ) -> Result<Vec<VacationRequest>, ApiError> {
        info!("Fetching vacation requests for {}", person_id);
        self.get_json(&format!("persons/{}/vacation-requests", person_id), &[])
            .await
    }

    async fn submit_vacation_request(
        &self,
        person_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<VacationRequest, ApiError> {
        info!(
            "Submitting vacation request for {} ({}..{})",
            person_id, start, end
        );
        self.post_json(
            &format!("persons/{}/vacation-requests", person_id),
            &SubmitVacationRequestBody {
                start_date: start,
                end_date: end,
            },
        )
        .await
    }

    async fn resolve_vacation_request(
        &self,
        request_id: &str,
        approve: bool,
    ) -> Result<VacationRequest, ApiError> {
        let action = if approve { "approve" } else { "decline" };
        info!("Resolving vacation request {} ({})", request_id, action);
        self.post_json(
            &format!("vacation-requests/{}/{}", request_id, action),
            &serde_json::json!({}),
        )
        .await
    }
}
