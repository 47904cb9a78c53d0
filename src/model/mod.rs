//! Shared entity model for the scoring and grounding pipelines.
//!
//! Channels and episodes arrive as read-only snapshots from the persistence
//! layer; everything else here is derived from them and recomputed on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    Audio,
    Video,
}

impl Default for Medium {
    fn default() -> Self {
        Self::Audio
    }
}

impl std::fmt::Display for Medium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

impl From<String> for Medium {
    fn from(s: String) -> Self {
        match s.as_str() {
            "video" => Self::Video,
            _ => Self::Audio,
        }
    }
}

/// A content source (audio/video series) owning zero or more episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub medium: Medium,
    pub description: Option<String>,
}

/// One unit of published media content belonging to a channel.
///
/// Optional fields are genuinely optional: transcript and artwork are added
/// after creation, and a missing or malformed field triggers a quality issue
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub channel_id: i64,
    pub title: String,
    /// Rich text, may contain markup. Stripped before length checks.
    pub description: Option<String>,
    /// Plain text, potentially tens of thousands of characters.
    pub transcript: Option<String>,
    /// `HH:MM:SS` or `MM:SS`. Unparsable values count as missing.
    pub duration: Option<String>,
    pub episode_number: Option<i64>,
    pub season_number: Option<i64>,
    pub artwork_url: Option<String>,
    pub has_custom_artwork: bool,
    pub file_size: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub excluded: bool,
    pub exclusion_reason: Option<String>,
}

// ============================================================================
// Quality scoring output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single detected quality deficiency. Value object — created once,
/// attached to exactly one `ScoreResult`, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub suggestion: String,
}

impl Issue {
    pub fn new(
        severity: Severity,
        category: &str,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.to_string(),
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// The outcome of evaluating one episode against the quality rule set.
///
/// Carries the owning channel id so cross-channel rankings can be grouped
/// for display without re-querying episode records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub episode_id: i64,
    pub channel_id: i64,
    pub episode_title: String,
    /// Clamped to `[0, 100]`: 100 minus the sum of rule penalties.
    pub score: u8,
    /// `clamp(ceil(score / 20), 1, 5)`.
    pub stars: u8,
    pub issues: Vec<Issue>,
    /// Estimate of how much the score could rise if key deficiencies
    /// (notably a missing transcript) were fixed. Drives the
    /// improvement-weighted global ranking.
    pub improvement_potential: u32,
}

// ============================================================================
// Query grounding output
// ============================================================================

/// Per-episode match strength against an expanded keyword set,
/// plus a small recency bonus. Unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceScore {
    pub episode_id: i64,
    pub score: i64,
    pub matched_keywords: Vec<String>,
}

/// One summarized episode inside a `ContextDocument`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEpisode {
    pub episode_id: i64,
    pub title: String,
    pub episode_number: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub relevance: i64,
    /// Markup-stripped, trimmed to at most 300 characters.
    pub description: Option<String>,
    /// Trimmed to at most 600 characters.
    pub transcript_excerpt: Option<String>,
}

/// The bounded, relevance-ranked bundle of episode content prepared as
/// grounding input for an external text-generation call. The core only
/// prepares this document; it never calls the generator itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub channel: Channel,
    pub corpus_size: usize,
    pub selected_count: usize,
    /// The expanded keywords that matched at least one selected episode.
    pub keywords: Vec<String>,
    pub episodes: Vec<ContextEpisode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_roundtrip() {
        assert_eq!(Medium::from("video".to_string()), Medium::Video);
        assert_eq!(Medium::from("audio".to_string()), Medium::Audio);
        // Unknown values fall back to audio
        assert_eq!(Medium::from("hologram".to_string()), Medium::Audio);
        assert_eq!(Medium::Video.to_string(), "video");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn test_score_result_serializes_snake_case_severity() {
        let issue = Issue::new(Severity::Warning, "Title", "too short", "lengthen it");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"warning\""));
        assert!(json.contains("\"Title\""));
    }
}
