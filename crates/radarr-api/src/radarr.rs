use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{
    ApiError, CalendarRange, Command, Endpoint, Paging, RadarrApi, validate_movie_id,
};
use crate::client::{HttpClient, TransportError};
use crate::config::{ConfigError, RadarrConfig};
use crate::health::HealthCheck;
use crate::models::{
    CommandStatus, DownloadItem, DownloadItemCollection, HealthCheckResult, HistoryRecord, Movie,
    Page, SystemSummary,
};

const API_PREFIX: &str = "/api/v3";
const QUEUE_PAGE_SIZE: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ClientInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Client for the Radarr v3 REST API.
///
/// All endpoints live under `{base_url}/api/v3/` and authenticate via the
/// `X-Api-Key` header (handled by [`HttpClient`]).
#[derive(Debug, Clone)]
pub struct RadarrClient {
    http: HttpClient,
    config: RadarrConfig,
}

impl RadarrClient {
    pub fn new(config: RadarrConfig) -> Result<Self, TransportError> {
        Ok(Self {
            http: HttpClient::new(&config)?,
            config,
        })
    }

    /// Build a client from `RADARR_*` environment variables.
    pub fn from_env() -> Result<Self, ClientInitError> {
        let config = RadarrConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    pub fn config(&self) -> &RadarrConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .send(Method::GET, &format!("{API_PREFIX}/{path}"), query, None)
            .await?;
        resp.json()
            .map_err(|source| ApiError::Decode { endpoint, source })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .send(Method::POST, &format!("{API_PREFIX}/{path}"), &[], Some(body))
            .await?;
        resp.json()
            .map_err(|source| ApiError::Decode { endpoint, source })
    }
}

fn paging_query(paging: Paging) -> Vec<(&'static str, String)> {
    vec![
        ("page", paging.page.to_string()),
        ("pageSize", paging.page_size.to_string()),
    ]
}

impl RadarrApi for RadarrClient {
    /// GET `/api/v3/movie`
    async fn movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.get(Endpoint::Movies, "movie", &[]).await
    }

    /// GET `/api/v3/movie/{id}`
    async fn movie(&self, id: i64) -> Result<Movie, ApiError> {
        validate_movie_id(id)?;
        self.get(Endpoint::Movie, &format!("movie/{id}"), &[]).await
    }

    /// GET `/api/v3/queue` — first page of the download queue.
    async fn downloads(&self) -> Result<DownloadItemCollection, ApiError> {
        let mut query = paging_query(Paging::new(1, QUEUE_PAGE_SIZE));
        query.push(("includeMovie", "true".to_string()));
        let page: Page<DownloadItem> = self.get(Endpoint::Downloads, "queue", &query).await?;
        Ok(page.into())
    }

    /// GET `/api/v3/system/status`
    async fn system_summary(&self) -> Result<SystemSummary, ApiError> {
        self.get(Endpoint::SystemSummary, "system/status", &[]).await
    }

    /// GET `/api/v3/calendar?start=..&end=..&unmonitored=..`
    async fn calendar(&self, range: CalendarRange) -> Result<Vec<Movie>, ApiError> {
        range.validate()?;
        let query = [
            ("start", range.start.to_string()),
            ("end", range.end.to_string()),
            ("unmonitored", range.unmonitored.to_string()),
        ];
        self.get(Endpoint::Calendar, "calendar", &query).await
    }

    /// GET `/api/v3/history`, newest first.
    async fn history(&self, paging: Paging) -> Result<Page<HistoryRecord>, ApiError> {
        paging.validate()?;
        let mut query = paging_query(paging);
        query.push(("sortKey", "date".to_string()));
        query.push(("sortDirection", "descending".to_string()));
        self.get(Endpoint::History, "history", &query).await
    }

    /// GET `/api/v3/wanted/missing`
    async fn wanted(&self, paging: Paging) -> Result<Page<Movie>, ApiError> {
        paging.validate()?;
        let mut query = paging_query(paging);
        query.push(("monitored", "true".to_string()));
        self.get(Endpoint::Wanted, "wanted/missing", &query).await
    }

    /// POST `/api/v3/command`
    async fn command(&self, command: Command) -> Result<CommandStatus, ApiError> {
        command.validate()?;
        let body = Value::Object(command.to_body());
        self.post(Endpoint::Command, "command", &body).await
    }

    /// GET `/api/v3/health`
    async fn health(&self) -> Result<Vec<HealthCheckResult>, ApiError> {
        self.get(Endpoint::Health, "health", &[]).await
    }
}

impl HealthCheck for RadarrClient {
    async fn is_healthy(&self) -> Result<bool, ApiError> {
        let status = self.system_summary().await?;
        if status.version.is_empty() {
            return Ok(false);
        }
        let checks = self.health().await?;
        Ok(!checks.iter().any(HealthCheckResult::is_error))
    }
}
