use crate::api::ApiError;

/// Uniform health-check interface for Radarr clients.
///
/// Implementations call the status and health endpoints; callers use the
/// result to report readiness.
pub trait HealthCheck: Send + Sync {
    /// Returns `Ok(true)` if Radarr is healthy, `Ok(false)` if it responded
    /// but reported an unhealthy state, or `Err` on connection failure.
    fn is_healthy(&self) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;
}
