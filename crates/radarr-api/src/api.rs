use std::fmt;
use std::future::Future;

use chrono::{Days, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::client::TransportError;
use crate::models::{
    CommandStatus, DownloadItemCollection, HealthCheckResult, HistoryRecord, Movie, Page,
    SystemSummary,
};

/// The logical endpoints a Radarr client exposes.
///
/// [`Endpoint::name`] is the stable identifier used in errors and in the
/// call log of test doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Movies,
    Movie,
    Downloads,
    SystemSummary,
    Calendar,
    History,
    Wanted,
    Command,
    Health,
}

impl Endpoint {
    pub const ALL: [Endpoint; 9] = [
        Endpoint::Movies,
        Endpoint::Movie,
        Endpoint::Downloads,
        Endpoint::SystemSummary,
        Endpoint::Calendar,
        Endpoint::History,
        Endpoint::Wanted,
        Endpoint::Command,
        Endpoint::Health,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Movies => "movies",
            Endpoint::Movie => "movie",
            Endpoint::Downloads => "downloads",
            Endpoint::SystemSummary => "systemSummary",
            Endpoint::Calendar => "calendar",
            Endpoint::History => "history",
            Endpoint::Wanted => "wanted",
            Endpoint::Command => "command",
            Endpoint::Health => "health",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("unexpected response shape from `{endpoint}`: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status when the server answered with a non-2xx code.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(TransportError::HttpStatus { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Page selection for paged listings. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub page_size: u32,
}

impl Paging {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page == 0 {
            return Err(ValidationError::new("page", "pages start at 1"));
        }
        if self.page_size == 0 {
            return Err(ValidationError::new("page_size", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

/// Inclusive date window for the release calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub unmonitored: bool,
}

impl CalendarRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            unmonitored: false,
        }
    }

    /// Today (UTC) through `days` days from now.
    pub fn upcoming(days: u64) -> Self {
        let start = Utc::now().date_naive();
        let end = start.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
        Self::new(start, end)
    }

    pub fn with_unmonitored(mut self, unmonitored: bool) -> Self {
        self.unmonitored = unmonitored;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start > self.end {
            return Err(ValidationError::new(
                "start",
                format!("{} is after end {}", self.start, self.end),
            ));
        }
        Ok(())
    }
}

/// A command for Radarr's `/command` endpoint.
///
/// Sent as `{"name": ..., <fields>}`, see [`Command::to_body`].
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    fields: Map<String, Value>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn refresh_movie(movie_ids: impl IntoIterator<Item = i64>) -> Self {
        Self::new("RefreshMovie").with_field("movieIds", ids(movie_ids))
    }

    pub fn movies_search(movie_ids: impl IntoIterator<Item = i64>) -> Self {
        Self::new("MoviesSearch").with_field("movieIds", ids(movie_ids))
    }

    pub fn rss_sync() -> Self {
        Self::new("RssSync")
    }

    pub fn downloaded_movies_scan() -> Self {
        Self::new("DownloadedMoviesScan")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "command name must not be empty"));
        }
        Ok(())
    }

    /// The JSON object sent as the request body.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::with_capacity(self.fields.len() + 1);
        body.insert("name".into(), Value::String(self.name.clone()));
        for (k, v) in &self.fields {
            body.insert(k.clone(), v.clone());
        }
        body
    }
}

fn ids(ids: impl IntoIterator<Item = i64>) -> Value {
    Value::Array(ids.into_iter().map(Value::from).collect())
}

pub fn validate_movie_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::new(
            "id",
            format!("movie id must be a positive integer, got {id}"),
        ));
    }
    Ok(())
}

/// Everything an application needs from a Radarr server.
///
/// Implemented by [`RadarrClient`](crate::RadarrClient) for real servers and
/// by the recording fake in `radarr-testing`. Consumers take
/// `impl RadarrApi` (or a generic) so tests can inject the fake.
pub trait RadarrApi: Send + Sync {
    /// All movies in the library.
    fn movies(&self) -> impl Future<Output = Result<Vec<Movie>, ApiError>> + Send;

    /// A single movie by id. `id` must be positive.
    fn movie(&self, id: i64) -> impl Future<Output = Result<Movie, ApiError>> + Send;

    /// The current download queue.
    fn downloads(&self) -> impl Future<Output = Result<DownloadItemCollection, ApiError>> + Send;

    fn system_summary(&self) -> impl Future<Output = Result<SystemSummary, ApiError>> + Send;

    /// Movies with a release date inside `range`.
    fn calendar(
        &self,
        range: CalendarRange,
    ) -> impl Future<Output = Result<Vec<Movie>, ApiError>> + Send;

    /// Download and import history, newest first.
    fn history(
        &self,
        paging: Paging,
    ) -> impl Future<Output = Result<Page<HistoryRecord>, ApiError>> + Send;

    /// Monitored movies that have no file yet.
    fn wanted(&self, paging: Paging) -> impl Future<Output = Result<Page<Movie>, ApiError>> + Send;

    /// Queue a command (refresh, search, RSS sync, ...).
    fn command(
        &self,
        command: Command,
    ) -> impl Future<Output = Result<CommandStatus, ApiError>> + Send;

    fn health(&self) -> impl Future<Output = Result<Vec<HealthCheckResult>, ApiError>> + Send;
}
