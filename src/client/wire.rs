//! Request/response bodies of the `comments:analyze` endpoint.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_COMMENT_CHARS;
use crate::metric::{Metric, ScoreSet};

use super::error::{CallError, CallResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub comment: Comment,
    pub requested_attributes: BTreeMap<String, AttributeOptions>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeOptions {}

impl AnalyzeRequest {
    /// Builds a request for every metric, truncating `text` to [`MAX_COMMENT_CHARS`].
    pub fn new(text: &str, metrics: &[Metric], language: &str) -> Self {
        Self {
            comment: Comment {
                text: truncate_chars(text, MAX_COMMENT_CHARS).to_string(),
            },
            requested_attributes: metrics
                .iter()
                .map(|m| (m.as_str().to_string(), AttributeOptions::default()))
                .collect(),
            languages: vec![language.to_string()],
        }
    }

    /// Requested metrics that are known to this crate.
    pub fn metrics(&self) -> Vec<Metric> {
        self.requested_attributes
            .keys()
            .filter_map(|k| k.parse().ok())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub attribute_scores: HashMap<String, AttributeScores>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeScores {
    pub summary_score: Option<SummaryScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryScore {
    pub value: f64,
}

impl AnalyzeResponse {
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (Metric, f64)>,
    {
        Self {
            attribute_scores: scores
                .into_iter()
                .map(|(m, value)| {
                    (
                        m.as_str().to_string(),
                        AttributeScores {
                            summary_score: Some(SummaryScore { value }),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Extracts the summary score of every metric in `metrics`.
    ///
    /// A missing or out-of-range score fails the whole response.
    pub fn score_set(&self, metrics: &[Metric]) -> CallResult<ScoreSet> {
        let mut scores = ScoreSet::default();
        for metric in metrics {
            let value = self
                .attribute_scores
                .get(metric.as_str())
                .and_then(|a| a.summary_score.as_ref())
                .map(|s| s.value)
                .ok_or(CallError::MissingMetric { metric: *metric })?;

            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CallError::ScoreOutOfRange {
                    metric: *metric,
                    value,
                });
            }
            scores.set(*metric, Some(value));
        }
        Ok(scores)
    }
}

/// Returns at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
