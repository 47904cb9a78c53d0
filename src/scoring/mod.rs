//! Quality rule evaluator.
//!
//! `evaluate` inspects one episode snapshot and produces a `ScoreResult`:
//! a 0–100 score, a 1–5 star rating, and the list of issues that produced
//! the deductions. The function is total and pure — missing or malformed
//! fields trigger issues, never errors, so one bad field can never prevent
//! scoring the rest of an episode or the rest of a batch.
//!
//! The thresholds and penalties below are policy constants. They must be
//! reproduced exactly for score parity across deployments; do not tune them
//! without bumping the policy discussion with stakeholders.

use crate::model::{Episode, Issue, ScoreResult, Severity};
use crate::policy::PolicyTable;
use regex::Regex;
use std::sync::OnceLock;

// ============================================================================
// Rule constants
// ============================================================================

const TITLE_MIN_LEN: usize = 30;
const TITLE_MAX_LEN: usize = 100;
const DESC_CRITICAL_LEN: usize = 500;
const DESC_WARNING_LEN: usize = 2000;
const OPENER_MAX_LEN: usize = 200;

const PENALTY_TITLE_SHORT: u32 = 15;
const PENALTY_TITLE_LONG: u32 = 10;
const PENALTY_TITLE_GENERIC: u32 = 5;
const PENALTY_DESC_THIN: u32 = 25;
const PENALTY_DESC_SHORT: u32 = 15;
const PENALTY_OPENER_FILLER: u32 = 10;
const PENALTY_OPENER_LONG: u32 = 5;
const PENALTY_NO_EPISODE_NUMBER: u32 = 10;
const PENALTY_NO_DURATION: u32 = 5;
const PENALTY_NO_ARTWORK: u32 = 5;
const PENALTY_NO_TRANSCRIPT: u32 = 15;

const POTENTIAL_NO_TRANSCRIPT: u32 = 40;
const POTENTIAL_SHORT_DESC: u32 = 30;
const POTENTIAL_WEAK_OPENER: u32 = 25;

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate one episode against the quality rule set.
///
/// Deterministic for identical input fields: no randomness, no external
/// calls, stable issue ordering. Calling it twice on an unchanged episode
/// yields identical results.
pub fn evaluate(episode: &Episode, policy: &PolicyTable) -> ScoreResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut penalty: u32 = 0;

    let title = episode.title.trim();
    let title_len = title.chars().count();
    let title_lower = title.to_lowercase();

    if title_len < TITLE_MIN_LEN {
        penalty += PENALTY_TITLE_SHORT;
        issues.push(Issue::new(
            Severity::Warning,
            "Title",
            format!("Title is only {} characters", title_len),
            "Aim for 30-100 characters that name the topic and the payoff",
        ));
    } else if title_len > TITLE_MAX_LEN {
        penalty += PENALTY_TITLE_LONG;
        issues.push(Issue::new(
            Severity::Warning,
            "Title",
            format!("Title is {} characters and will be cut off in most players", title_len),
            "Trim to 100 characters or fewer",
        ));
    }

    if let Some(weak) = policy
        .weak_title_words
        .iter()
        .find(|w| title_lower.contains(w.as_str()))
    {
        penalty += PENALTY_TITLE_GENERIC;
        issues.push(Issue::new(
            Severity::Info,
            "Title",
            format!("Title contains the generic word \"{}\"", weak),
            "Replace generic words with the episode's actual subject",
        ));
    }

    let stripped = strip_html(episode.description.as_deref().unwrap_or(""));
    let desc_len = stripped.chars().count();

    if desc_len < DESC_CRITICAL_LEN {
        penalty += PENALTY_DESC_THIN;
        issues.push(Issue::new(
            Severity::Critical,
            "Description",
            format!("Description is only {} characters of actual text", desc_len),
            "Write at least 500 characters covering topics, guests, and takeaways",
        ));
    } else if desc_len < DESC_WARNING_LEN {
        penalty += PENALTY_DESC_SHORT;
        issues.push(Issue::new(
            Severity::Warning,
            "Description",
            format!("Description is {} characters; search surfaces favor 2000+", desc_len),
            "Expand with timestamps, key quotes, or a topic outline",
        ));
    }

    let opener = opening_sentence(&stripped);
    let opener_lower = opener.to_lowercase();

    if let Some(filler) = find_filler(&opener_lower, &policy.filler_words) {
        penalty += PENALTY_OPENER_FILLER;
        issues.push(Issue::new(
            Severity::Warning,
            "Hook",
            format!("Opening sentence contains the filler word \"{}\"", filler),
            "Rewrite the first sentence as a direct hook with no filler",
        ));
    }
    if opener.chars().count() > OPENER_MAX_LEN {
        penalty += PENALTY_OPENER_LONG;
        issues.push(Issue::new(
            Severity::Info,
            "Hook",
            "Opening sentence runs past 200 characters",
            "Break the opener into a short hook sentence",
        ));
    }

    if episode.episode_number.is_none() {
        penalty += PENALTY_NO_EPISODE_NUMBER;
        issues.push(Issue::new(
            Severity::Warning,
            "Structure",
            "No episode number set",
            "Assign an episode number so players can order the feed",
        ));
    }

    let duration_known = episode
        .duration
        .as_deref()
        .and_then(parse_duration_secs)
        .is_some();
    if !duration_known {
        penalty += PENALTY_NO_DURATION;
        issues.push(Issue::new(
            Severity::Info,
            "Structure",
            "Duration is missing or unreadable",
            "Set the duration as HH:MM:SS or MM:SS",
        ));
    }

    let has_artwork = episode
        .artwork_url
        .as_deref()
        .map(|u| !u.trim().is_empty())
        .unwrap_or(false)
        || episode.has_custom_artwork;
    if !has_artwork {
        penalty += PENALTY_NO_ARTWORK;
        issues.push(Issue::new(
            Severity::Info,
            "Visual",
            "No episode artwork",
            "Add per-episode artwork or enable channel-level custom art",
        ));
    }

    let has_transcript = episode
        .transcript
        .as_deref()
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false);
    if !has_transcript {
        penalty += PENALTY_NO_TRANSCRIPT;
        issues.push(Issue::new(
            Severity::Warning,
            "Accessibility",
            "No transcript attached",
            "Attach a transcript; it drives both accessibility and search",
        ));
    }

    let score = 100u32.saturating_sub(penalty) as u8;

    ScoreResult {
        episode_id: episode.id,
        channel_id: episode.channel_id,
        episode_title: episode.title.clone(),
        score,
        stars: stars_for(score),
        issues,
        improvement_potential: improvement_potential(
            has_transcript,
            desc_len,
            &opener_lower,
            policy,
        ),
    }
}

/// `clamp(ceil(score / 20), 1, 5)`.
pub fn stars_for(score: u8) -> u8 {
    ((score as u32 + 19) / 20).clamp(1, 5) as u8
}

/// How much the score could rise if the big-ticket deficiencies were fixed.
/// Additive and independent of the §rule penalties, though it reads the
/// same underlying facts.
fn improvement_potential(
    has_transcript: bool,
    desc_len: usize,
    opener_lower: &str,
    policy: &PolicyTable,
) -> u32 {
    let mut potential = 0;
    if !has_transcript {
        potential += POTENTIAL_NO_TRANSCRIPT;
    }
    if desc_len < DESC_WARNING_LEN {
        potential += POTENTIAL_SHORT_DESC;
    }
    let weak_start = policy
        .weak_opener_phrases
        .iter()
        .any(|p| opener_lower.trim_start().starts_with(p.as_str()));
    let vague = policy
        .vague_words
        .iter()
        .any(|v| contains_word(opener_lower, v));
    if weak_start || vague {
        potential += POTENTIAL_WEAK_OPENER;
    }
    potential
}

// ============================================================================
// Text helpers (shared with the context summarizer)
// ============================================================================

/// Strip HTML tags and decode the handful of entities feed descriptions
/// actually use, collapsing whitespace afterward.
pub fn strip_html(text: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());

    let no_tags = re.replace_all(text, " ");
    let decoded = no_tags
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse `HH:MM:SS` or `MM:SS` into seconds. Anything else is `None` —
/// a malformed duration degrades to "unknown" rather than failing the
/// whole evaluation. The minutes field of the two-field form is
/// unbounded, so `75:30` reads as a 75-minute episode; the middle field
/// of `HH:MM:SS` stays under 60.
pub fn parse_duration_secs(raw: &str) -> Option<u32> {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    let re = DURATION_RE.get_or_init(|| {
        Regex::new(r"^(?:(\d{1,3}):([0-5]?\d)|(\d{1,4})):([0-5]\d)$").unwrap()
    });

    let caps = re.captures(raw.trim())?;
    let seconds: u32 = caps[4].parse().ok()?;
    let (hours, minutes): (u32, u32) = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(h), Some(m), _) => (h.as_str().parse().ok()?, m.as_str().parse().ok()?),
        (_, _, Some(m)) => (0, m.as_str().parse().ok()?),
        _ => return None,
    };
    Some(hours * 3600 + minutes * 60 + seconds)
}

/// Text before the first `.`; the whole text when no period exists.
pub fn opening_sentence(text: &str) -> &str {
    match text.find('.') {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Multiword filler entries match as substrings ("you know"); single words
/// match whole tokens only, so "like" never fires on "likely".
fn find_filler<'a>(sentence_lower: &str, fillers: &'a [String]) -> Option<&'a str> {
    fillers
        .iter()
        .find(|f| {
            if f.contains(' ') {
                sentence_lower.contains(f.as_str())
            } else {
                contains_word(sentence_lower, f.as_str())
            }
        })
        .map(String::as_str)
}

fn contains_word(haystack_lower: &str, word: &str) -> bool {
    haystack_lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|t| t == word)
}
