use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use radarr_api::{
    ApiError, CalendarRange, Command, CommandStatus, DownloadItem, DownloadItemCollection,
    Endpoint, HealthCheck, HealthCheckResult, HistoryRecord, Movie, Page, Paging, RadarrApi,
    SystemSummary, validate_movie_id,
};
use serde_json::{Map, Value, json};
use tracing::trace;

use crate::factories;

/// Arguments of one recorded call, keyed by parameter name.
pub type CallArgs = Map<String, Value>;

type Generator = dyn Fn(&CallArgs) -> Value + Send + Sync;

/// A seeded answer: a fixed payload or a closure over the call arguments.
#[derive(Clone)]
pub enum FakeResponse {
    Value(Value),
    Generator(Arc<Generator>),
}

impl FakeResponse {
    pub fn generator(f: impl Fn(&CallArgs) -> Value + Send + Sync + 'static) -> Self {
        FakeResponse::Generator(Arc::new(f))
    }

    fn produce(&self, args: &CallArgs) -> Value {
        match self {
            FakeResponse::Value(v) => v.clone(),
            FakeResponse::Generator(f) => f(args),
        }
    }
}

impl From<Value> for FakeResponse {
    fn from(value: Value) -> Self {
        FakeResponse::Value(value)
    }
}

impl fmt::Debug for FakeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FakeResponse::Value(v) => f.debug_tuple("Value").field(v).finish(),
            FakeResponse::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub endpoint: String,
    pub arguments: CallArgs,
    /// Position in the overall call log, starting at 0.
    pub sequence: u64,
}

#[derive(Debug, Default)]
struct FakeState {
    responses: HashMap<String, FakeResponse>,
    calls: Vec<CallRecord>,
    next_sequence: u64,
}

/// Recording stand-in for [`RadarrClient`](radarr_api::RadarrClient).
///
/// Every call is logged and answered from the response table, falling back
/// to built-in sample data. Nothing ever goes over the network. Clones share
/// the same table and log, so a test can keep one handle for assertions and
/// give another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct RadarrFake {
    state: Arc<Mutex<FakeState>>,
}

impl RadarrFake {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fake pre-seeded with `responses`, keyed like [`set_response`](Self::set_response).
    pub fn with_responses<I, K, R>(responses: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<FakeResponse>,
    {
        let fake = Self::new();
        for (key, response) in responses {
            fake.set_response(key, response);
        }
        fake
    }

    /// Seed the answer for `key`: a bare endpoint name (`"movie"`) or one
    /// qualified by id (`"movie/10"`). Replaces any earlier answer.
    pub fn set_response(&self, key: impl Into<String>, response: impl Into<FakeResponse>) {
        self.state().responses.insert(key.into(), response.into());
    }

    /// Record a call to `endpoint` and return its payload.
    pub fn invoke(&self, endpoint: &str, arguments: CallArgs) -> Value {
        let seeded = {
            let mut state = self.state();
            let sequence = state.next_sequence;
            state.next_sequence += 1;
            trace!(endpoint, sequence, "fake radarr call");
            let seeded = resolve(&state.responses, endpoint, &arguments);
            state.calls.push(CallRecord {
                endpoint: endpoint.to_string(),
                arguments: arguments.clone(),
                sequence,
            });
            seeded
        };

        // Generators run outside the lock so they may call back into the fake.
        match seeded {
            Some(response) => response.produce(&arguments),
            None => factories::default_response(endpoint, &arguments),
        }
    }

    /// Every call for each endpoint, in call order.
    pub fn calls(&self) -> BTreeMap<String, Vec<CallArgs>> {
        let mut calls: BTreeMap<String, Vec<CallArgs>> = BTreeMap::new();
        for record in &self.state().calls {
            calls
                .entry(record.endpoint.clone())
                .or_default()
                .push(record.arguments.clone());
        }
        calls
    }

    /// The whole call log in call order.
    pub fn recorded(&self) -> Vec<CallRecord> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Forget recorded calls. Seeded responses stay.
    pub fn reset_calls(&self) {
        self.state().calls.clear();
    }

    #[track_caller]
    pub fn assert_called(&self, endpoint: &str) {
        assert!(
            self.call_count(endpoint) > 0,
            "expected `{endpoint}` to be called, but it was not"
        );
    }

    #[track_caller]
    pub fn assert_not_called(&self, endpoint: &str) {
        let count = self.call_count(endpoint);
        assert!(
            count == 0,
            "expected `{endpoint}` not to be called, but it was called {count} time(s)"
        );
    }

    #[track_caller]
    pub fn assert_called_times(&self, endpoint: &str, times: usize) {
        let count = self.call_count(endpoint);
        assert!(
            count == times,
            "expected `{endpoint}` to be called {times} time(s), but it was called {count} time(s)"
        );
    }

    /// Passes when at least one call to `endpoint` had exactly `expected` as
    /// its arguments object.
    #[track_caller]
    pub fn assert_called_with(&self, endpoint: &str, expected: Value) {
        let seen: Vec<CallArgs> = self.calls().remove(endpoint).unwrap_or_default();
        let matched = seen.iter().any(|args| match &expected {
            Value::Object(expected) => args == expected,
            _ => false,
        });
        assert!(
            matched,
            "expected `{endpoint}` to be called with {expected}, recorded calls: {seen:?}"
        );
    }

    #[track_caller]
    pub fn assert_nothing_called(&self) {
        let endpoints: Vec<String> = self.recorded().into_iter().map(|c| c.endpoint).collect();
        assert!(
            endpoints.is_empty(),
            "expected no calls, but recorded: {endpoints:?}"
        );
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        // A failed assertion in another test thread must not wedge this one.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn call<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        arguments: CallArgs,
    ) -> Result<T, ApiError> {
        let payload = self.invoke(endpoint.name(), arguments);
        serde_json::from_value(payload).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

/// Response-table keys to try for a call, most specific first.
fn candidate_keys(endpoint: &str, arguments: &CallArgs) -> Vec<String> {
    let mut keys = Vec::with_capacity(2);
    let discriminator = match arguments.get("id") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };
    if let Some(id) = discriminator {
        keys.push(format!("{endpoint}/{id}"));
    }
    keys.push(endpoint.to_string());
    keys
}

fn resolve(
    responses: &HashMap<String, FakeResponse>,
    endpoint: &str,
    arguments: &CallArgs,
) -> Option<FakeResponse> {
    candidate_keys(endpoint, arguments)
        .iter()
        .find_map(|key| responses.get(key).cloned())
}

fn args(value: Value) -> CallArgs {
    match value {
        Value::Object(map) => map,
        _ => CallArgs::new(),
    }
}

fn paging_args(paging: Paging) -> CallArgs {
    args(json!({ "page": paging.page, "pageSize": paging.page_size }))
}

impl RadarrApi for RadarrFake {
    async fn movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.call(Endpoint::Movies, CallArgs::new())
    }

    async fn movie(&self, id: i64) -> Result<Movie, ApiError> {
        validate_movie_id(id)?;
        self.call(Endpoint::Movie, args(json!({ "id": id })))
    }

    async fn downloads(&self) -> Result<DownloadItemCollection, ApiError> {
        let page: Page<DownloadItem> = self.call(Endpoint::Downloads, CallArgs::new())?;
        Ok(page.into())
    }

    async fn system_summary(&self) -> Result<SystemSummary, ApiError> {
        self.call(Endpoint::SystemSummary, CallArgs::new())
    }

    async fn calendar(&self, range: CalendarRange) -> Result<Vec<Movie>, ApiError> {
        range.validate()?;
        let arguments = args(json!({
            "start": range.start.to_string(),
            "end": range.end.to_string(),
            "unmonitored": range.unmonitored,
        }));
        self.call(Endpoint::Calendar, arguments)
    }

    async fn history(&self, paging: Paging) -> Result<Page<HistoryRecord>, ApiError> {
        paging.validate()?;
        self.call(Endpoint::History, paging_args(paging))
    }

    async fn wanted(&self, paging: Paging) -> Result<Page<Movie>, ApiError> {
        paging.validate()?;
        self.call(Endpoint::Wanted, paging_args(paging))
    }

    async fn command(&self, command: Command) -> Result<CommandStatus, ApiError> {
        command.validate()?;
        self.call(Endpoint::Command, command.to_body())
    }

    async fn health(&self) -> Result<Vec<HealthCheckResult>, ApiError> {
        self.call(Endpoint::Health, CallArgs::new())
    }
}

impl HealthCheck for RadarrFake {
    async fn is_healthy(&self) -> Result<bool, ApiError> {
        let status = self.system_summary().await?;
        if status.version.is_empty() {
            return Ok(false);
        }
        let checks = self.health().await?;
        Ok(!checks.iter().any(HealthCheckResult::is_error))
    }
}
