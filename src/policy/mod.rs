//! Versioned policy table shared by the rule evaluator and keyword expander.
//!
//! These word lists were historically inlined at every call site; they now
//! live in one table so both engines see the same vocabulary and so the
//! lists can be overridden from a YAML file without a rebuild. Numeric
//! thresholds and penalties are deliberately NOT here — they are policy
//! constants in their owning modules and must match exactly across
//! deployments for score parity.

use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One topic cluster: when a query token matches any trigger, the full
/// expansion set is unioned into the keyword set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCluster {
    pub triggers: Vec<String>,
    pub expansions: Vec<String>,
}

/// The full word-list table. Every field has a serde default so a partial
/// YAML file overrides only the lists it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyTable {
    /// Bumped whenever a list changes meaningfully, so logged results can
    /// be traced back to the vocabulary that produced them.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Generic words that make a title forgettable.
    #[serde(default = "default_weak_title_words")]
    pub weak_title_words: Vec<String>,

    /// Filler words that weaken an opening sentence. Multiword entries are
    /// matched as substrings, single words as whole tokens.
    #[serde(default = "default_filler_words")]
    pub filler_words: Vec<String>,

    /// Common short function words dropped during query expansion.
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Vague words whose presence in an opener signals rewrite potential.
    #[serde(default = "default_vague_words")]
    pub vague_words: Vec<String>,

    /// Boilerplate phrases a weak opening sentence starts with.
    #[serde(default = "default_weak_opener_phrases")]
    pub weak_opener_phrases: Vec<String>,

    #[serde(default = "default_topic_clusters")]
    pub topic_clusters: Vec<TopicCluster>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            version: default_version(),
            weak_title_words: default_weak_title_words(),
            filler_words: default_filler_words(),
            stop_words: default_stop_words(),
            vague_words: default_vague_words(),
            weak_opener_phrases: default_weak_opener_phrases(),
            topic_clusters: default_topic_clusters(),
        }
    }
}

impl PolicyTable {
    /// Load a policy table from a YAML file. Lists missing from the file
    /// keep their compiled-in defaults. Unreadable files surface as `Io`,
    /// unparsable ones as `Config` with the offending path.
    pub fn from_yaml_file(path: &Path) -> Result<Self, OptimizerError> {
        let content = std::fs::read_to_string(path)?;
        let table: PolicyTable = serde_yaml::from_str(&content)
            .map_err(|e| OptimizerError::Config(format!("{}: {}", path.display(), e)))?;
        log::info!(
            "Loaded policy table v{} from {} ({} topic clusters)",
            table.version,
            path.display(),
            table.topic_clusters.len()
        );
        Ok(table)
    }
}

// ============================================================================
// Compiled-in defaults (policy v1)
// ============================================================================

fn default_version() -> u32 {
    1
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_weak_title_words() -> Vec<String> {
    strings(&[
        "episode",
        "show",
        "podcast",
        "talk",
        "discussion",
        "conversation",
    ])
}

fn default_filler_words() -> Vec<String> {
    strings(&[
        "um",
        "uh",
        "like",
        "you know",
        "basically",
        "actually",
        "literally",
        "obviously",
    ])
}

fn default_stop_words() -> Vec<String> {
    strings(&[
        "the", "and", "for", "with", "that", "this", "from", "what", "when",
        "where", "who", "why", "how", "are", "was", "were", "have", "has",
        "had", "but", "not", "you", "your", "can", "will", "all", "any",
        "about", "into", "over", "out", "our", "they", "them", "their",
    ])
}

fn default_vague_words() -> Vec<String> {
    strings(&["thing", "stuff", "something"])
}

fn default_weak_opener_phrases() -> Vec<String> {
    strings(&["in this episode", "today we", "welcome to"])
}

fn default_topic_clusters() -> Vec<TopicCluster> {
    vec![
        TopicCluster {
            triggers: strings(&["interview", "guest", "talk"]),
            expansions: strings(&[
                "interview",
                "guest",
                "conversation",
                "chat",
                "discussion",
                "with",
            ]),
        },
        TopicCluster {
            triggers: strings(&["news", "update", "recap"]),
            expansions: strings(&["news", "update", "recap", "announcement", "roundup"]),
        },
        TopicCluster {
            triggers: strings(&["tutorial", "guide", "howto"]),
            expansions: strings(&["tutorial", "guide", "learn", "walkthrough", "lesson"]),
        },
        TopicCluster {
            triggers: strings(&["review", "reaction"]),
            expansions: strings(&["review", "reaction", "opinion", "thoughts", "verdict"]),
        },
    ]
}
