//! Prioritization ranker for score results.
//!
//! Sorting is the single ordering-sensitive step of the scoring pipeline,
//! so both modes use a stable sort with input order as the implicit final
//! tie-break. Excluded episodes are the caller's concern; the ranker itself
//! has no opinion on exclusion policy.

use crate::model::ScoreResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Ascending by score: the episodes most in need of attention first.
    WorstFirst,
    /// Descending by improvement potential, then ascending by score.
    /// Used for cross-channel global views.
    ImprovementWeighted,
}

impl Default for RankMode {
    fn default() -> Self {
        Self::WorstFirst
    }
}

impl std::fmt::Display for RankMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorstFirst => write!(f, "worst_first"),
            Self::ImprovementWeighted => write!(f, "improvement_weighted"),
        }
    }
}

impl From<String> for RankMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "improvement_weighted" => Self::ImprovementWeighted,
            _ => Self::WorstFirst,
        }
    }
}

/// Order a batch of score results. Never fails; an empty input yields an
/// empty output. Ties preserve the original relative order (`sort_by` is
/// stable), which keeps rankings deterministic across runs.
pub fn rank(mut results: Vec<ScoreResult>, mode: RankMode) -> Vec<ScoreResult> {
    match mode {
        RankMode::WorstFirst => {
            results.sort_by(|a, b| a.score.cmp(&b.score));
        }
        RankMode::ImprovementWeighted => {
            results.sort_by(|a, b| {
                b.improvement_potential
                    .cmp(&a.improvement_potential)
                    .then(a.score.cmp(&b.score))
            });
        }
    }
    results
}
