//! Scoring dimensions reported by the service, and per-row score sets.

mod score_set;


pub use score_set::ScoreSet;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::METRIC_COLUMN_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A named attribute the scoring service can report.
pub enum Metric {
    Toxicity,
    SevereToxicity,
    IdentityAttack,
    Insult,
    Profanity,
    Threat,
    SexuallyExplicit,
    Flirtation,
    AttackOnAuthor,
    AttackOnCommenter,
    Incoherent,
    Inflammatory,
    LikelyToReject,
    Obscene,
    Spam,
    Unsubstantial,
}

/// Returned when a metric name is not part of [`Metric::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric '{0}'")]
pub struct UnknownMetric(pub String);

impl Metric {
    /// Every attribute the service exposes.
    pub const ALL: [Metric; 16] = [
        Metric::Toxicity,
        Metric::SevereToxicity,
        Metric::IdentityAttack,
        Metric::Insult,
        Metric::Profanity,
        Metric::Threat,
        Metric::SexuallyExplicit,
        Metric::Flirtation,
        Metric::AttackOnAuthor,
        Metric::AttackOnCommenter,
        Metric::Incoherent,
        Metric::Inflammatory,
        Metric::LikelyToReject,
        Metric::Obscene,
        Metric::Spam,
        Metric::Unsubstantial,
    ];

    /// Metrics measured when none are configured.
    pub const DEFAULTS: [Metric; 6] = [
        Metric::Toxicity,
        Metric::SevereToxicity,
        Metric::IdentityAttack,
        Metric::Insult,
        Metric::Profanity,
        Metric::Threat,
    ];

    /// Wire name, as used in requests and responses (e.g. `SEVERE_TOXICITY`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Toxicity => "TOXICITY",
            Metric::SevereToxicity => "SEVERE_TOXICITY",
            Metric::IdentityAttack => "IDENTITY_ATTACK",
            Metric::Insult => "INSULT",
            Metric::Profanity => "PROFANITY",
            Metric::Threat => "THREAT",
            Metric::SexuallyExplicit => "SEXUALLY_EXPLICIT",
            Metric::Flirtation => "FLIRTATION",
            Metric::AttackOnAuthor => "ATTACK_ON_AUTHOR",
            Metric::AttackOnCommenter => "ATTACK_ON_COMMENTER",
            Metric::Incoherent => "INCOHERENT",
            Metric::Inflammatory => "INFLAMMATORY",
            Metric::LikelyToReject => "LIKELY_TO_REJECT",
            Metric::Obscene => "OBSCENE",
            Metric::Spam => "SPAM",
            Metric::Unsubstantial => "UNSUBSTANTIAL",
        }
    }

    /// Result table column holding this metric (e.g. `psp_toxicity`).
    pub fn column_name(&self) -> String {
        format!("{}{}", METRIC_COLUMN_PREFIX, self.as_str().to_lowercase())
    }

    /// Inverse of [`column_name`](Self::column_name).
    pub fn from_column_name(column: &str) -> Option<Metric> {
        let name = column.strip_prefix(METRIC_COLUMN_PREFIX)?;
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }

    /// Parses a comma-separated list, skipping blank entries and duplicates.
    pub fn parse_list(list: &str) -> Result<Vec<Metric>, UnknownMetric> {
        let mut metrics = Vec::new();
        for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let metric: Metric = part.parse()?;
            if !metrics.contains(&metric) {
                metrics.push(metric);
            }
        }
        Ok(metrics)
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', ' '], "_");
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
