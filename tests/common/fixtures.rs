//! Input files and configs for integration tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use perspective::config::Config;
use perspective::metric::Metric;

pub const SUBJECT_COLUMN: &str = "changed_query";

pub const TEST_METRICS: [Metric; 3] = [Metric::Toxicity, Metric::Insult, Metric::Threat];

/// Writes `comments.csv` with an `id` column and one subject per entry; `None` leaves the cell empty.
pub fn write_input(dir: &Path, subjects: &[Option<&str>]) -> PathBuf {
    let path = dir.join("comments.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(["id", SUBJECT_COLUMN]).unwrap();
    for (i, subject) in subjects.iter().enumerate() {
        writer
            .write_record([i.to_string().as_str(), subject.unwrap_or_default()])
            .unwrap();
    }
    writer.flush().unwrap();
    path
}

/// `count` subjects named `text-0`, `text-1`, ...
pub fn numbered_subjects(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("text-{i}")).collect()
}

/// Fast config: no pacing, tiny backoff, result directory under `dir`.
pub fn fast_config(dir: &Path, input_path: PathBuf) -> Config {
    Config {
        api_key: Some("integration-key".to_string()),
        input_path,
        result_dir: dir.join("result"),
        metrics: TEST_METRICS.to_vec(),
        concurrency: 3,
        inter_batch_delay: Duration::ZERO,
        checkpoint_interval: 4,
        max_retries: 3,
        backoff_base: Duration::from_millis(1),
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

/// Reads the result CSV as (headers, records).
pub fn read_result(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, records)
}
