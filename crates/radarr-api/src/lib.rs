//! Typed client for the Radarr v3 REST API.
//!
//! [`RadarrClient`] talks to a real server; the `radarr-testing` crate
//! provides a recording fake. Both implement [`RadarrApi`], so application
//! code takes the trait and never cares which one it has.

pub mod api;
pub mod client;
pub mod config;
pub mod health;
pub mod models;
pub mod radarr;

pub use api::{
    ApiError, CalendarRange, Command, Endpoint, Paging, RadarrApi, ValidationError,
    validate_movie_id,
};
pub use client::{HttpClient, RawResponse, TransportError};
pub use config::{ConfigError, RadarrConfig};
pub use health::HealthCheck;
pub use models::{
    CommandStatus, DownloadItem, DownloadItemCollection, HealthCheckResult, HistoryRecord, Movie,
    Page, SystemSummary,
};
pub use radarr::{ClientInitError, RadarrClient};
