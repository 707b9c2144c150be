use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Dimensions, Placement};

/// Result of normalizing one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Normalized {
        source: PathBuf,
        output: PathBuf,
        original: Dimensions,
        placement: Placement,
        flattened_alpha: bool,
    },
    Failed {
        source: PathBuf,
        cause: String,
    },
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Normalized { .. })
    }
}

/// Aggregated outcome of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            outcomes: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub fn push(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// `(source, cause)` for every item that did not produce output.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Failed { source, cause } => Some((source.as_path(), cause.as_str())),
            ItemOutcome::Normalized { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(name: &str) -> ItemOutcome {
        ItemOutcome::Normalized {
            source: PathBuf::from(name),
            output: PathBuf::from("out").join(name),
            original: Dimensions::new(1920, 1080),
            placement: Placement {
                scaled: Dimensions::new(1280, 720),
                offset_x: 0,
                offset_y: 40,
            },
            flattened_alpha: false,
        }
    }

    #[test]
    fn counts_successes_and_failures() {
        let mut report = BatchReport::start();
        report.push(normalized("a.png"));
        report.push(ItemOutcome::Failed {
            source: PathBuf::from("b.png"),
            cause: "bad header".to_string(),
        });
        report.push(normalized("c.png"));
        let report = report.finish();

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures, vec![(Path::new("b.png"), "bad header")]);
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn outcome_is_tagged_in_json() {
        let json = serde_json::to_value(ItemOutcome::Failed {
            source: PathBuf::from("x.png"),
            cause: "nope".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["cause"], "nope");
    }
}
