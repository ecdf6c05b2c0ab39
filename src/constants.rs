//! Cross-cutting, shared constants.
//!
//! Defaults here are the fallbacks used by [`Config`](crate::config::Config) when no
//! `PSP_*` override is present.

use std::time::Duration;

/// Longest comment (in characters) the service accepts; longer text is truncated.
pub const MAX_COMMENT_CHARS: usize = 20_480;

/// Prefix of every score column written to the result table.
pub const METRIC_COLUMN_PREFIX: &str = "psp_";

/// Suffix appended to the input stem when deriving the result filename.
pub const RESULT_FILE_SUFFIX: &str = "_result.csv";

pub const DEFAULT_RESULT_DIR: &str = "./result";
pub const DEFAULT_INPUT_PATH: &str = "data/sample.csv";
pub const DEFAULT_SUBJECT_COLUMN: &str = "changed_query";
pub const DEFAULT_LANGUAGE: &str = "en";

pub const DEFAULT_ENDPOINT: &str =
    "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_INTER_BATCH_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 10;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const FLUSH_MAX_ATTEMPTS: u32 = 3;
pub const FLUSH_BACKOFF_BASE: Duration = Duration::from_millis(200);

/// Exit status after a second interrupt (128 + SIGINT).
pub const FORCED_EXIT_CODE: i32 = 130;

/// Cell values read as "no value", for subject text and score cells alike.
///
/// Mirrors the NA spellings common CSV tooling writes and reads back.
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns `true` if `value` is one of the [`NULL_MARKERS`].
pub fn is_null_marker(value: &str) -> bool {
    NULL_MARKERS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_marker() {
        assert!(is_null_marker(""));
        assert!(is_null_marker("NaN"));
        assert!(is_null_marker("null"));
        assert!(!is_null_marker("hello"));
        assert!(!is_null_marker(" "));
        assert!(!is_null_marker("0"));
    }

    #[test]
    fn test_backoff_defaults_are_nonzero() {
        assert!(DEFAULT_BACKOFF_BASE > Duration::ZERO);
        assert!(FLUSH_BACKOFF_BASE > Duration::ZERO);
        assert!(DEFAULT_MAX_RETRIES >= 1);
    }
}
