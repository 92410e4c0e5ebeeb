use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "CancerDSS";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default predictor endpoint (the FastAPI model server).
pub const DEFAULT_PREDICTOR_URL: &str = "http://127.0.0.1:8010";

/// Quiet period before a scenario edit is sent to the predictor.
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Request timeout for predictor calls.
pub const DEFAULT_PREDICTOR_TIMEOUT_SECS: u64 = 30;

/// Local API bind address for the browser front end.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8020";

/// History database file name inside the data directory.
const HISTORY_DB_FILE: &str = "history.db";

/// Get the application data directory
/// ~/CancerDSS/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "cancer_dss_lib=info,cancer_dss=info,tower_http=warn"
}

/// Runtime configuration, resolved from `CANCER_DSS_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub predictor_url: String,
    pub predictor_timeout: Duration,
    pub debounce: Duration,
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let predictor_url = lookup("CANCER_DSS_PREDICTOR_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.predictor_url);

        let debounce = Duration::from_millis(parse_or_default(
            &lookup,
            "CANCER_DSS_DEBOUNCE_MS",
            DEFAULT_DEBOUNCE_MS,
        ));

        // A zero timeout would fail every request immediately.
        let predictor_timeout = match parse_or_default(
            &lookup,
            "CANCER_DSS_PREDICTOR_TIMEOUT_SECS",
            DEFAULT_PREDICTOR_TIMEOUT_SECS,
        ) {
            0 => defaults.predictor_timeout,
            secs => Duration::from_secs(secs),
        };

        let bind_addr = match lookup("CANCER_DSS_BIND") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "Invalid CANCER_DSS_BIND, using default");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let data_dir = lookup("CANCER_DSS_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Self {
            predictor_url,
            predictor_timeout,
            debounce,
            bind_addr,
            data_dir,
        }
    }

    /// Path of the SQLite history database.
    pub fn history_db_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_DB_FILE)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            predictor_url: DEFAULT_PREDICTOR_URL.to_string(),
            predictor_timeout: Duration::from_secs(DEFAULT_PREDICTOR_TIMEOUT_SECS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8020)),
            data_dir: app_data_dir(),
        }
    }
}

fn parse_or_default<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
            tracing::warn!(key, value = %raw, error = %e, "Invalid numeric setting, using default");
            default
        }),
        None => default,
    }
}
