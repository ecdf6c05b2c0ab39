use super::Metric;

#[derive(Debug, Clone, PartialEq, Default)]
/// Nullable score per configured metric, kept in configuration order.
///
/// A `None` entry means "not yet computed" or "failed terminally"; both read the same.
pub struct ScoreSet {
    entries: Vec<(Metric, Option<f64>)>,
}

impl ScoreSet {
    /// Creates a set with every metric null.
    pub fn empty(metrics: &[Metric]) -> Self {
        Self {
            entries: metrics.iter().map(|m| (*m, None)).collect(),
        }
    }

    /// Creates a set from explicit entries (order preserved, later duplicates win).
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Metric, Option<f64>)>,
    {
        let mut set = Self::default();
        for (metric, score) in entries {
            set.set(metric, score);
        }
        set
    }

    /// Returns the score for `metric` (`None` if null or not tracked).
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.entries
            .iter()
            .find(|(m, _)| *m == metric)
            .and_then(|(_, s)| *s)
    }

    /// Sets `metric`, appending it if it is not tracked yet.
    pub fn set(&mut self, metric: Metric, score: Option<f64>) {
        match self.entries.iter_mut().find(|(m, _)| *m == metric) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((metric, score)),
        }
    }

    /// Returns `true` if every tracked metric has a score.
    pub fn is_complete(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|(_, s)| s.is_some())
    }

    /// Returns `true` if no tracked metric has a score.
    pub fn is_all_null(&self) -> bool {
        self.entries.iter().all(|(_, s)| s.is_none())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
