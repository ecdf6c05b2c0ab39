//! Environment-backed configuration.
//!
//! Every setting has a default except the API key. Override with `PSP_*` environment
//! variables; the key also falls back to `GOOGLE_API_KEY`.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::RetryPolicy;
use crate::constants::{
    DEFAULT_BACKOFF_BASE, DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_CONCURRENCY, DEFAULT_ENDPOINT,
    DEFAULT_INPUT_PATH, DEFAULT_INTER_BATCH_DELAY, DEFAULT_LANGUAGE, DEFAULT_MAX_RETRIES,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESULT_DIR, DEFAULT_SUBJECT_COLUMN,
};
use crate::metric::Metric;
use crate::scheduler::SchedulerConfig;
use crate::table::result_path_for;

/// Run configuration.
///
/// Use [`Config::from_env`] to read `PSP_*` overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// Service credential, passed through untouched.
    pub api_key: Option<String>,

    /// Source CSV. Default: `data/sample.csv`.
    pub input_path: PathBuf,

    /// Directory the result CSV is written to. Default: `./result`.
    pub result_dir: PathBuf,

    /// Column holding the text to score. Default: `changed_query`.
    pub subject_column: String,

    /// Language hint sent with every request. Default: `en`.
    pub language: String,

    /// Metrics requested per row. Default: [`Metric::DEFAULTS`].
    pub metrics: Vec<Metric>,

    /// Rows per batch, scored concurrently. Default: `1`.
    pub concurrency: usize,

    /// Pause between batches. Default: `500ms`.
    pub inter_batch_delay: Duration,

    /// Rows between checkpoint flushes. Default: `10`.
    pub checkpoint_interval: usize,

    /// Attempts per remote call. Default: `3`.
    pub max_retries: u32,

    /// Backoff base; attempt `k` waits `base * 2^k`. Default: `2s`.
    pub backoff_base: Duration,

    /// Per-request timeout. Default: `30s`.
    pub request_timeout: Duration,

    /// Analyze endpoint URL.
    pub endpoint: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.redacted_api_key())
            .field("input_path", &self.input_path)
            .field("result_dir", &self.result_dir)
            .field("subject_column", &self.subject_column)
            .field("language", &self.language)
            .field("metrics", &self.metrics)
            .field("concurrency", &self.concurrency)
            .field("inter_batch_delay", &self.inter_batch_delay)
            .field("checkpoint_interval", &self.checkpoint_interval)
            .field("max_retries", &self.max_retries)
            .field("backoff_base", &self.backoff_base)
            .field("request_timeout", &self.request_timeout)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            result_dir: PathBuf::from(DEFAULT_RESULT_DIR),
            subject_column: DEFAULT_SUBJECT_COLUMN.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            metrics: Metric::DEFAULTS.to_vec(),
            concurrency: DEFAULT_CONCURRENCY,
            inter_batch_delay: DEFAULT_INTER_BATCH_DELAY,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    const ENV_API_KEY: &'static str = "PSP_API_KEY";
    const ENV_API_KEY_FALLBACK: &'static str = "GOOGLE_API_KEY";
    const ENV_INPUT_PATH: &'static str = "PSP_INPUT_PATH";
    const ENV_RESULT_DIR: &'static str = "PSP_RESULT_DIR";
    const ENV_SUBJECT_COLUMN: &'static str = "PSP_SUBJECT_COLUMN";
    const ENV_LANGUAGE: &'static str = "PSP_LANGUAGE";
    const ENV_METRICS: &'static str = "PSP_METRICS";
    const ENV_CONCURRENCY: &'static str = "PSP_CONCURRENCY";
    const ENV_INTER_BATCH_DELAY_MS: &'static str = "PSP_INTER_BATCH_DELAY_MS";
    const ENV_CHECKPOINT_INTERVAL: &'static str = "PSP_CHECKPOINT_INTERVAL";
    const ENV_MAX_RETRIES: &'static str = "PSP_MAX_RETRIES";
    const ENV_BACKOFF_BASE_MS: &'static str = "PSP_BACKOFF_BASE_MS";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "PSP_REQUEST_TIMEOUT_SECS";
    const ENV_ENDPOINT: &'static str = "PSP_ENDPOINT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_API_KEY_FALLBACK));

        let metrics = match env::var(Self::ENV_METRICS) {
            Ok(value) => Metric::parse_list(&value).map_err(|e| ConfigError::UnknownMetric {
                name: Self::ENV_METRICS,
                value: e.0,
            })?,
            Err(_) => defaults.metrics,
        };

        Ok(Self {
            api_key,
            input_path: Self::parse_path_from_env(Self::ENV_INPUT_PATH, defaults.input_path),
            result_dir: Self::parse_path_from_env(Self::ENV_RESULT_DIR, defaults.result_dir),
            subject_column: Self::parse_string_from_env(
                Self::ENV_SUBJECT_COLUMN,
                defaults.subject_column,
            ),
            language: Self::parse_string_from_env(Self::ENV_LANGUAGE, defaults.language),
            metrics,
            concurrency: Self::parse_u64_from_env(
                Self::ENV_CONCURRENCY,
                defaults.concurrency as u64,
            )? as usize,
            inter_batch_delay: Duration::from_millis(Self::parse_u64_from_env(
                Self::ENV_INTER_BATCH_DELAY_MS,
                defaults.inter_batch_delay.as_millis() as u64,
            )?),
            checkpoint_interval: Self::parse_u64_from_env(
                Self::ENV_CHECKPOINT_INTERVAL,
                defaults.checkpoint_interval as u64,
            )? as usize,
            max_retries: Self::parse_u64_from_env(
                Self::ENV_MAX_RETRIES,
                u64::from(defaults.max_retries),
            )?
            .min(u64::from(u32::MAX)) as u32,
            backoff_base: Duration::from_millis(Self::parse_u64_from_env(
                Self::ENV_BACKOFF_BASE_MS,
                defaults.backoff_base.as_millis() as u64,
            )?),
            request_timeout: Duration::from_secs(Self::parse_u64_from_env(
                Self::ENV_REQUEST_TIMEOUT_SECS,
                defaults.request_timeout.as_secs(),
            )?),
            endpoint: Self::parse_string_from_env(Self::ENV_ENDPOINT, defaults.endpoint),
        })
    }

    /// Validates invariants and the input path (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            });
        }

        if self.metrics.is_empty() {
            return Err(ConfigError::NoMetrics);
        }

        if self.concurrency == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_CONCURRENCY,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.checkpoint_interval == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_CHECKPOINT_INTERVAL,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.max_retries == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_MAX_RETRIES,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
                reason: "must be at least 1 second".to_string(),
            });
        }

        if !self.input_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.input_path.clone(),
            });
        }
        if !self.input_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.input_path.clone(),
            });
        }

        if self.result_dir.exists() && !self.result_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.result_dir.clone(),
            });
        }

        Ok(())
    }

    /// `<result_dir>/<input-stem>_result.csv`.
    pub fn result_path(&self) -> PathBuf {
        result_path_for(&self.input_path, &self.result_dir)
    }

    /// API key with all but the last four characters hidden (for logging).
    pub fn redacted_api_key(&self) -> String {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                let tail: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("***{tail}")
            }
            _ => "NOT SET".to_string(),
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(
            self.concurrency,
            self.inter_batch_delay,
            self.checkpoint_interval,
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.backoff_base)
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}
