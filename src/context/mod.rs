//! Context selection for grounding an external text-generation call.
//!
//! Given a channel's corpus and an expanded keyword set, pick a bounded,
//! relevance-ranked subset of episodes and trim their text fields so the
//! resulting document fits a fixed content budget. The core only builds the
//! document; calling the generator (with its own timeout/retry policy) is
//! the caller's job.

use crate::model::{Channel, ContextDocument, ContextEpisode, Episode, RelevanceScore};
use crate::relevance::{recency_order, score_episode};
use crate::scoring::strip_html;
use std::collections::HashSet;

/// Selection cap: 10% of the corpus, clamped to [15, 25].
const CAP_FRACTION_DIVISOR: usize = 10;
const CAP_MIN: usize = 15;
const CAP_MAX: usize = 25;

/// Selections below this are padded with the most recent episodes.
const MIN_SELECTED: usize = 10;

const DESCRIPTION_BUDGET_CHARS: usize = 300;
const TRANSCRIPT_BUDGET_CHARS: usize = 600;

/// Build a grounding document for one channel.
///
/// Every episode gets a relevance score; the top strictly-positive scorers
/// are taken up to the cap, then padded with the most recent episodes
/// (no duplicates) until `min(10, corpus)` if too few qualified. An empty
/// corpus yields a document with zero episodes — "no grounding available"
/// is a state the caller must handle, not an error.
pub fn select(channel: &Channel, episodes: &[Episode], keywords: &[String]) -> ContextDocument {
    let corpus_size = episodes.len();
    let cap = (corpus_size / CAP_FRACTION_DIVISOR).clamp(CAP_MIN, CAP_MAX);

    // Score in reverse-chronological order so positions feed the recency
    // bonus, then re-sort by relevance. The sort is stable, so ties keep
    // their recency order.
    let by_recency = recency_order(episodes);
    let mut scored: Vec<(usize, RelevanceScore)> = by_recency
        .iter()
        .enumerate()
        .map(|(position, &idx)| (idx, score_episode(&episodes[idx], keywords, position)))
        .collect();
    scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));

    let mut selected: Vec<&(usize, RelevanceScore)> = scored
        .iter()
        .filter(|entry| entry.1.score > 0)
        .take(cap)
        .collect();

    // Pad thin selections with the most recent episodes.
    let floor = MIN_SELECTED.min(corpus_size);
    if selected.len() < floor {
        for &idx in &by_recency {
            if selected.len() >= floor {
                break;
            }
            if selected.iter().any(|entry| entry.0 == idx) {
                continue;
            }
            if let Some(entry) = scored.iter().find(|entry| entry.0 == idx) {
                selected.push(entry);
            }
        }
    }

    // The document reports the keywords that actually hit a selected
    // episode, in expansion order, not the whole expansion.
    let hits: HashSet<&str> = selected
        .iter()
        .flat_map(|entry| entry.1.matched_keywords.iter().map(String::as_str))
        .collect();
    let matched: Vec<String> = keywords
        .iter()
        .filter(|k| hits.contains(k.as_str()))
        .cloned()
        .collect();

    let episodes_out: Vec<ContextEpisode> = selected
        .iter()
        .map(|entry| summarize(&episodes[entry.0], entry.1.score))
        .collect();

    ContextDocument {
        channel: channel.clone(),
        corpus_size,
        selected_count: episodes_out.len(),
        keywords: matched,
        episodes: episodes_out,
    }
}

// ============================================================================
// Summarizer
// ============================================================================

/// Trim one selected episode down to its budgeted excerpt sizes.
fn summarize(episode: &Episode, relevance: i64) -> ContextEpisode {
    let description = episode
        .description
        .as_deref()
        .map(strip_html)
        .filter(|d| !d.is_empty())
        .map(|d| truncate_at_sentence(&d, DESCRIPTION_BUDGET_CHARS));

    let transcript_excerpt = episode
        .transcript
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| truncate_at_sentence(t, TRANSCRIPT_BUDGET_CHARS));

    ContextEpisode {
        episode_id: episode.id,
        title: episode.title.clone(),
        episode_number: episode.episode_number,
        published_at: episode.published_at,
        relevance,
        description,
        transcript_excerpt,
    }
}

/// Trim `text` to at most `max_chars`, cutting at the sentence boundary
/// (`.`, `!`, `?`) nearest to but not exceeding the limit. With no boundary
/// inside the limit, hard-truncate on a char boundary.
pub fn truncate_at_sentence(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }

    let mut last_boundary_end: Option<usize> = None;
    let mut hard_cut = 0usize;
    for (count, (byte_idx, c)) in trimmed.char_indices().enumerate() {
        if count >= max_chars {
            break;
        }
        let end = byte_idx + c.len_utf8();
        hard_cut = end;
        if matches!(c, '.' | '!' | '?') {
            last_boundary_end = Some(end);
        }
    }

    trimmed[..last_boundary_end.unwrap_or(hard_cut)]
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Medium;
    use chrono::{TimeZone, Utc};

    fn channel() -> Channel {
        Channel {
            id: 1,
            name: "Ice Core Radio".to_string(),
            medium: Medium::Audio,
            description: Some("Glaciology, weekly".to_string()),
        }
    }

    fn episode(id: i64, title: &str) -> Episode {
        Episode {
            id,
            channel_id: 1,
            title: title.to_string(),
            description: Some("Plain description text".to_string()),
            transcript: None,
            duration: None,
            episode_number: Some(id),
            season_number: None,
            artwork_url: None,
            has_custom_artwork: false,
            file_size: None,
            published_at: Utc.timestamp_opt(1_700_000_000 + id * 86_400, 0).single(),
            excluded: false,
            exclusion_reason: None,
        }
    }

    #[test]
    fn test_empty_corpus_yields_empty_document() {
        let doc = select(&channel(), &[], &["glacier".to_string()]);
        assert_eq!(doc.corpus_size, 0);
        assert_eq!(doc.selected_count, 0);
        assert!(doc.episodes.is_empty());
        assert_eq!(doc.channel.name, "Ice Core Radio");
    }

    #[test]
    fn test_cap_limits_positive_matches() {
        // 40 episodes, all matching: cap = clamp(40/10, 15, 25) = 15
        let episodes: Vec<Episode> = (1..=40)
            .map(|id| episode(id, &format!("Glacier report {}", id)))
            .collect();
        let doc = select(&channel(), &episodes, &["glacier".to_string()]);
        assert_eq!(doc.selected_count, 15);
        assert_eq!(doc.episodes.len(), 15);
        // Everything selected actually matched
        assert!(doc.episodes.iter().all(|e| e.relevance > 0));
    }

    #[test]
    fn test_cap_upper_clamp() {
        // 400 episodes would give 40 by the fraction; clamp holds it at 25
        let episodes: Vec<Episode> = (1..=400)
            .map(|id| episode(id, &format!("Glacier report {}", id)))
            .collect();
        let doc = select(&channel(), &episodes, &["glacier".to_string()]);
        assert_eq!(doc.selected_count, 25);
    }

    #[test]
    fn test_padding_to_ten_with_no_signal() {
        // No keywords: only the 5 newest get a positive recency score, so
        // padding tops the selection up to 10 most-recent, no duplicates.
        let episodes: Vec<Episode> = (1..=30).map(|id| episode(id, "Quiet title")).collect();
        let doc = select(&channel(), &episodes, &[]);
        assert_eq!(doc.selected_count, 10);
        let mut ids: Vec<i64> = doc.episodes.iter().map(|e| e.episode_id).collect();
        // The ten most recent episodes, each exactly once
        ids.sort_unstable();
        assert_eq!(ids, (21..=30).collect::<Vec<i64>>());
    }

    #[test]
    fn test_document_keywords_are_matched_only() {
        let mut episodes: Vec<Episode> = (1..=12).map(|id| episode(id, "Quiet title")).collect();
        episodes[2].title = "Glacier special".to_string();
        let keywords = vec!["glacier".to_string(), "volcano".to_string()];
        let doc = select(&channel(), &episodes, &keywords);
        // Only the keyword a selected episode actually hit is reported
        assert_eq!(doc.keywords, vec!["glacier".to_string()]);
    }

    #[test]
    fn test_small_corpus_selects_everything() {
        let episodes: Vec<Episode> = (1..=3).map(|id| episode(id, "Quiet title")).collect();
        let doc = select(&channel(), &episodes, &[]);
        assert_eq!(doc.selected_count, 3);
    }

    #[test]
    fn test_relevant_episodes_rank_before_padding() {
        let mut episodes: Vec<Episode> = (1..=20).map(|id| episode(id, "Quiet title")).collect();
        // One old but highly relevant episode
        episodes[0].title = "Glacier glacier glacier special".to_string();
        let doc = select(&channel(), &episodes, &["glacier".to_string()]);
        assert_eq!(doc.episodes[0].episode_id, 1);
        assert!(doc.episodes[0].relevance >= 20);
    }

    #[test]
    fn test_summaries_respect_budgets() {
        let long_sentence = "word ".repeat(200); // no boundary at all
        let mut ep = episode(1, "Budget check");
        ep.description = Some(format!("Lead sentence here. {}", long_sentence));
        ep.transcript = Some(long_sentence.clone());
        let doc = select(&channel(), &[ep], &[]);
        let out = &doc.episodes[0];
        let desc = out.description.as_ref().unwrap();
        let excerpt = out.transcript_excerpt.as_ref().unwrap();
        assert!(desc.chars().count() <= 300);
        assert!(excerpt.chars().count() <= 600);
        // Description had a boundary inside the budget and ends on it
        assert!(desc.ends_with('.'));
    }

    #[test]
    fn test_truncate_prefers_sentence_boundary() {
        let text = "First sentence. Second sentence! Third one is much longer than the rest.";
        let cut = truncate_at_sentence(text, 40);
        assert_eq!(cut, "First sentence. Second sentence!");
    }

    #[test]
    fn test_truncate_hard_cut_without_boundary() {
        let text = "no boundaries in this text at all just words";
        let cut = truncate_at_sentence(text, 20);
        assert!(cut.chars().count() <= 20);
        assert!(!cut.is_empty());
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_at_sentence("Short. Text.", 300), "Short. Text.");
    }

    #[test]
    fn test_truncate_respects_utf8() {
        let text = "héllo wörld ünïcode çharacters everywhere today".repeat(3);
        let cut = truncate_at_sentence(&text, 25);
        assert!(cut.chars().count() <= 25);
    }
}
