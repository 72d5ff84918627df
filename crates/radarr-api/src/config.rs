use std::collections::HashMap;
use std::env::VarError;
use std::fmt;
use std::net::Ipv6Addr;
use std::time::Duration;

use tracing::debug;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 7878;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Settings keys and the environment variables that feed them, with the
/// value used when the variable is unset.
const ENV_SETTINGS: [(&str, &str, &str); 6] = [
    ("host", "RADARR_HOST", DEFAULT_HOST),
    ("port", "RADARR_PORT", "7878"),
    ("api_key", "RADARR_API_KEY", ""),
    ("use_https", "RADARR_USE_HTTPS", "false"),
    ("timeout", "RADARR_TIMEOUT", "30"),
    ("url_base", "RADARR_URL_BASE", ""),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{field}`")]
    Missing { field: &'static str },
    #[error("invalid value {value:?} for setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Connection settings for a single Radarr server.
///
/// Immutable once built. Cloning is cheap enough to hand a copy to every
/// client that needs one.
#[derive(Clone, PartialEq, Eq)]
pub struct RadarrConfig {
    host: String,
    port: u16,
    api_key: String,
    use_https: bool,
    timeout_seconds: u64,
    url_base: String,
}

impl RadarrConfig {
    /// Plain-HTTP settings with the default timeout and no URL base.
    pub fn new(host: impl Into<String>, port: u16, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            api_key: api_key.into(),
            use_https: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            url_base: String::new(),
        }
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_url_base(mut self, url_base: &str) -> Self {
        self.url_base = normalize_url_base(url_base);
        self
    }

    /// Build settings from a key/value source.
    ///
    /// `host`, `port` and `api_key` are required. `use_https`, `timeout` and
    /// `url_base` fall back to `false`, `30` and `""`.
    pub fn from_settings<I, K, V>(settings: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let settings: HashMap<String, String> = settings
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .collect();

        let host = required(&settings, "host")?.trim().to_string();
        if host.is_empty() {
            return Err(invalid("host", &host, "must not be empty"));
        }

        let port = parse_port(required(&settings, "port")?)?;
        let api_key = required(&settings, "api_key")?.to_string();

        let use_https = match settings.get("use_https") {
            Some(v) => parse_bool(v).ok_or_else(|| invalid("use_https", v, "expected a boolean"))?,
            None => false,
        };

        let timeout_seconds = match settings.get("timeout") {
            Some(v) => parse_timeout(v)?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        let url_base = settings
            .get("url_base")
            .map(|v| normalize_url_base(v))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            api_key,
            use_https,
            timeout_seconds,
            url_base,
        })
    }

    /// Build settings from `RADARR_*` environment variables.
    ///
    /// Unset variables take their defaults (`localhost:7878`, no key, plain
    /// HTTP, 30s timeout). A variable that is set but malformed is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Vec::with_capacity(ENV_SETTINGS.len());
        for (key, var, default) in ENV_SETTINGS {
            let value = match std::env::var(var) {
                Ok(v) => {
                    if key != "api_key" {
                        debug!(%var, value = %v, "using setting from env");
                    }
                    v
                }
                Err(VarError::NotPresent) => default.to_string(),
                Err(VarError::NotUnicode(raw)) => {
                    return Err(ConfigError::Invalid {
                        field: key,
                        value: raw.to_string_lossy().into_owned(),
                        reason: "not valid unicode",
                    });
                }
            };
            settings.push((key, value));
        }
        Self::from_settings(settings)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn use_https(&self) -> bool {
        self.use_https
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// `None` when the timeout is disabled (configured as `0`).
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    /// Path prefix for reverse-proxied installs, e.g. `/radarr`. Empty when unset.
    pub fn url_base(&self) -> &str {
        &self.url_base
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_https { "https" } else { "http" }
    }

    /// `{scheme}://{host}:{port}{url_base}`, without a trailing slash.
    ///
    /// IPv6 literals are bracketed (`http://[::1]:7878`).
    pub fn base_url(&self) -> String {
        let host = if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!("{}://{}:{}{}", self.scheme(), host, self.port, self.url_base)
    }
}

impl Default for RadarrConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, "")
    }
}

impl fmt::Debug for RadarrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadarrConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("use_https", &self.use_https)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("url_base", &self.url_base)
            .finish()
    }
}

fn required<'a>(
    settings: &'a HashMap<String, String>,
    field: &'static str,
) -> Result<&'a str, ConfigError> {
    settings
        .get(field)
        .map(String::as_str)
        .ok_or(ConfigError::Missing { field })
}

fn invalid(field: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        field,
        value: value.to_string(),
        reason,
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid("port", value, "expected an integer in 1..=65535")),
        Ok(port) => Ok(port),
    }
}

fn parse_timeout(value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid("timeout", value, "expected a non-negative number of seconds"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn normalize_url_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
