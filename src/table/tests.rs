use super::*;
use crate::metric::{Metric, ScoreSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const METRICS: [Metric; 2] = [Metric::Toxicity, Metric::Insult];

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn source_csv(dir: &Path) -> PathBuf {
    write_file(
        dir,
        "sample.csv",
        "id,text\n1,hello\n2,\n3,NaN\n4,world\n",
    )
}

#[test]
fn test_result_path_for_uses_input_stem() {
    let path = result_path_for(Path::new("data/sample.csv"), Path::new("./result"));
    assert_eq!(path, PathBuf::from("./result/sample_result.csv"));
}

#[test]
fn test_load_fresh_table() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = dir.path().join("sample_result.csv");

    let loaded = load(&source, &result, "text", &METRICS).expect("load");

    assert!(!loaded.resumed);
    assert_eq!(loaded.cursor, 0);
    assert_eq!(loaded.source.len(), 4);
    assert_eq!(loaded.result.len(), 4);
    assert_eq!(
        loaded.result.column_names(),
        vec!["id", "text", "psp_toxicity", "psp_insult"]
    );
    assert!(loaded.result.rows().iter().all(|r| r.scores.is_all_null()));
}

#[test]
fn test_subjects_map_null_markers_to_none() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let loaded = load(&source, &dir.path().join("r.csv"), "text", &METRICS).unwrap();

    assert_eq!(
        loaded.source.subjects(),
        vec![
            Some("hello".to_string()),
            None,
            None,
            Some("world".to_string())
        ]
    );
    assert_eq!(loaded.source.subject_column(), "text");
}

#[test]
fn test_missing_subject_column_lists_available() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());

    let err = load(&source, &dir.path().join("r.csv"), "comment", &METRICS).unwrap_err();

    match err {
        TableError::MissingSubjectColumn {
            column, available, ..
        } => {
            assert_eq!(column, "comment");
            assert_eq!(available, vec!["id".to_string(), "text".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_source_file() {
    let dir = TempDir::new().unwrap();
    let err = load(
        &dir.path().join("absent.csv"),
        &dir.path().join("r.csv"),
        "text",
        &METRICS,
    )
    .unwrap_err();
    assert!(matches!(err, TableError::SourceNotFound { .. }));
}

#[test]
fn test_resume_cursor_equals_completed_prefix() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_toxicity,psp_insult\n1,hello,0.1,0.2\n2,,0.0,0.0\n3,NaN,,\n4,world,,\n",
    );

    let loaded = load(&source, &result, "text", &METRICS).unwrap();

    assert!(loaded.resumed);
    assert_eq!(loaded.cursor, 2);
    assert_eq!(
        loaded.result.row(0).unwrap().scores.get(Metric::Insult),
        Some(0.2)
    );
}

#[test]
fn test_resume_cursor_after_full_completion() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_toxicity,psp_insult\n1,a,0.1,0.2\n2,b,0.3,0.4\n3,c,0.5,0.6\n4,d,0.7,0.8\n",
    );

    let loaded = load(&source, &result, "text", &METRICS).unwrap();
    assert_eq!(loaded.cursor, 4);
}

#[test]
fn test_resume_cursor_skips_holes_behind_last_complete_row() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_toxicity,psp_insult\n1,a,,\n2,b,0.3,\n3,c,0.5,0.6\n4,d,,\n",
    );

    let loaded = load(&source, &result, "text", &METRICS).unwrap();
    assert_eq!(loaded.cursor, 3);
    assert_eq!(loaded.result.incomplete_before(loaded.cursor), 2);
}

#[test]
fn test_existing_result_without_metric_column_gets_null_column() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_toxicity\n1,a,0.1\n2,b,0.3\n3,c,0.5\n4,d,0.7\n",
    );

    let loaded = load(&source, &result, "text", &METRICS).unwrap();

    assert_eq!(loaded.cursor, 0);
    assert_eq!(
        loaded.result.column_names(),
        vec!["id", "text", "psp_toxicity", "psp_insult"]
    );
    assert_eq!(
        loaded.result.row(3).unwrap().scores.get(Metric::Toxicity),
        Some(0.7)
    );
}

#[test]
fn test_unconfigured_metric_columns_pass_through() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_threat,psp_toxicity,psp_insult\n1,a,0.9,0.1,0.2\n2,b,,,\n3,c,,,\n4,d,,,\n",
    );

    let loaded = load(&source, &result, "text", &METRICS).unwrap();

    assert_eq!(loaded.result.headers(), &["id", "text", "psp_threat"]);
    assert_eq!(loaded.result.row(0).unwrap().fields[2], "0.9");
    assert_eq!(loaded.cursor, 1);
}

#[test]
fn test_metric_columns_are_recognised_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_TOXICITY,Psp_Insult\n1,a,0.1,0.2\n2,b,0.3,0.4\n3,c,,\n4,d,,\n",
    );

    let loaded = load(&source, &result, "text", &METRICS).unwrap();

    // Only the metric name is case-insensitive; the prefix must match exactly.
    assert_eq!(loaded.result.headers(), &["id", "text", "Psp_Insult"]);
    assert_eq!(loaded.result.row(1).unwrap().scores.get(Metric::Toxicity), Some(0.3));
    assert_eq!(loaded.result.row(1).unwrap().scores.get(Metric::Insult), None);
    assert_eq!(loaded.cursor, 0);
}

#[test]
fn test_row_count_mismatch_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_toxicity,psp_insult\n1,a,0.1,0.2\n",
    );

    let err = load(&source, &result, "text", &METRICS).unwrap_err();
    assert!(matches!(
        err,
        TableError::RowCountMismatch {
            expected: 4,
            actual: 1,
            ..
        }
    ));
}

#[test]
fn test_invalid_score_cell_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_toxicity,psp_insult\n1,a,high,0.2\n2,b,,\n3,c,,\n4,d,,\n",
    );

    let err = load(&source, &result, "text", &METRICS).unwrap_err();
    match err {
        TableError::InvalidScore { row, column, value } => {
            assert_eq!(row, 0);
            assert_eq!(column, "psp_toxicity");
            assert_eq!(value, "high");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_set_scores_writes_by_index_and_keeps_configured_metrics() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let mut table = load(&source, &dir.path().join("r.csv"), "text", &METRICS)
        .unwrap()
        .result;

    let scores = ScoreSet::from_entries([
        (Metric::Insult, Some(0.4)),
        (Metric::Threat, Some(0.9)),
    ]);
    table.set_scores(2, &scores).unwrap();

    let row = table.row(2).unwrap();
    assert_eq!(row.scores.len(), 2);
    assert_eq!(row.scores.get(Metric::Insult), Some(0.4));
    assert_eq!(row.scores.get(Metric::Toxicity), None);
    assert_eq!(row.scores.get(Metric::Threat), None);
    assert!(table.row(1).unwrap().scores.is_all_null());
}

#[test]
fn test_set_scores_out_of_range() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let mut table = load(&source, &dir.path().join("r.csv"), "text", &METRICS)
        .unwrap()
        .result;

    let err = table
        .set_scores(10, &ScoreSet::empty(&METRICS))
        .unwrap_err();
    assert!(matches!(err, TableError::RowOutOfRange { index: 10, len: 4 }));
}

#[test]
fn test_written_csv_loads_back_identically() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result_path = dir.path().join("r.csv");
    let mut table = load(&source, &result_path, "text", &METRICS).unwrap().result;

    table
        .set_scores(
            0,
            &ScoreSet::from_entries([(Metric::Toxicity, Some(0.25)), (Metric::Insult, Some(1.0))]),
        )
        .unwrap();
    fs::write(&result_path, table.to_csv_bytes().unwrap()).unwrap();

    let reloaded = load(&source, &result_path, "text", &METRICS).unwrap();
    assert_eq!(reloaded.result, table);
    assert_eq!(reloaded.cursor, 1);
}

#[test]
fn test_metric_mean_ignores_nulls() {
    let dir = TempDir::new().unwrap();
    let source = source_csv(dir.path());
    let result = write_file(
        dir.path(),
        "r.csv",
        "id,text,psp_toxicity,psp_insult\n1,a,0.2,\n2,b,0.4,\n3,c,,\n4,d,,\n",
    );

    let table = load(&source, &result, "text", &METRICS).unwrap().result;
    let mean = table.metric_mean(Metric::Toxicity).unwrap();
    assert!((mean - 0.3).abs() < 1e-9);
    assert_eq!(table.metric_mean(Metric::Insult), None);
}

#[test]
fn test_fresh_table_replaces_colliding_metric_column() {
    let dir = TempDir::new().unwrap();
    let source = write_file(
        dir.path(),
        "s.csv",
        "text,psp_toxicity\nhello,stale\n",
    );

    let loaded = load(&source, &dir.path().join("r.csv"), "text", &METRICS).unwrap();
    assert_eq!(
        loaded.result.column_names(),
        vec!["text", "psp_toxicity", "psp_insult"]
    );
    assert_eq!(loaded.result.row(0).unwrap().fields, vec!["hello"]);
}
