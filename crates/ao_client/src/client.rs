//! Async client for the simulation service.
//!
//! Three endpoints, all `POST` with the compiled request as the JSON body:
//! `/api/simulate` (results), `/api/simulate/csv` and `/api/simulate/json`
//! (downloads). One call yields one whole response or one error.

use ao_sim::results::SimulationResponse;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::settings::ClientSettings;

pub const SIMULATE_PATH: &str = "/api/simulate";
pub const CSV_PATH: &str = "/api/simulate/csv";
pub const JSON_PATH: &str = "/api/simulate/json";

pub const SIMULATION_FAILED: &str = "Simulation failed";
pub const CSV_DOWNLOAD_FAILED: &str = "CSV download failed";
pub const JSON_DOWNLOAD_FAILED: &str = "JSON download failed";

#[derive(Clone)]
pub struct SimulationClient {
    http: reqwest::Client,
    base_url: String,
}

impl SimulationClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(ClientError::transport("could not build HTTP client"))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a simulation and decode the full result.
    pub async fn simulate<T: Serialize + ?Sized>(
        &self,
        request: &T,
    ) -> Result<SimulationResponse, ClientError> {
        let body = self.post(SIMULATE_PATH, request, SIMULATION_FAILED).await?;
        let response: SimulationResponse = serde_json::from_str(&body)?;
        info!(
            steps = response.steps.len(),
            conditions = response.condition_summaries.len(),
            "simulation finished"
        );
        Ok(response)
    }

    /// Run a simulation and return the CSV export verbatim.
    pub async fn download_csv<T: Serialize + ?Sized>(&self, request: &T) -> Result<String, ClientError> {
        self.post(CSV_PATH, request, CSV_DOWNLOAD_FAILED).await
    }

    /// Run a simulation and return the JSON export verbatim.
    pub async fn download_json<T: Serialize + ?Sized>(&self, request: &T) -> Result<String, ClientError> {
        self.post(JSON_PATH, request, JSON_DOWNLOAD_FAILED).await
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        request: &T,
        fallback: &'static str,
    ) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ClientError::transport(fallback))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ClientError::transport(fallback))?;

        if !status.is_success() {
            let err = service_error(status, &body, fallback);
            warn!(%status, "{}", err);
            return Err(err);
        }
        Ok(body)
    }
}

/// Build the error for a non-2xx answer. A string `detail` is used as-is, any
/// other `detail` value is rendered as compact JSON, and a missing or
/// unreadable body falls back to `fallback`.
pub fn service_error(status: StatusCode, body: &str, fallback: &str) -> ClientError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());
    let detail = match detail {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Null) | Some(Value::String(_)) | None => fallback.to_string(),
        Some(other) => other.to_string(),
    };
    ClientError::Service { status, detail }
}
