//! Query keyword expansion and per-episode relevance scoring.
//!
//! `expand` turns a free-text query into a deduplicated keyword set using
//! the policy table's stop words and topic clusters. `score_episode` then
//! measures one episode's match strength against that set, with a small
//! recency bonus so recent episodes win ties without recency ever
//! dominating keyword relevance.

use crate::model::{Episode, RelevanceScore};
use crate::policy::PolicyTable;
use crate::scoring::strip_html;

const MIN_TOKEN_LEN: usize = 3;

const TITLE_MATCH_BONUS: i64 = 20;
const DESCRIPTION_MATCH_BONUS: i64 = 10;
const TRANSCRIPT_OCCURRENCE_BONUS: i64 = 3;
const GUEST_TITLE_BONUS: i64 = 15;
const GUEST_DESCRIPTION_BONUS: i64 = 10;
const LONG_FORM_BONUS: i64 = 5;
const LONG_FORM_TRANSCRIPT_CHARS: usize = 5000;
const MAX_RECENCY_BONUS: usize = 5;

// ============================================================================
// Keyword expansion
// ============================================================================

/// Expand a free-text query into a keyword set.
///
/// Lowercases, strips punctuation, splits on whitespace, drops short
/// tokens and stop words, then unions in topic-cluster expansions for any
/// trigger token. Output order is first-seen and therefore stable, which
/// keeps logs and tests reproducible. An empty or all-stopword query
/// yields an empty set — downstream treats that as "no signal".
pub fn expand(query: &str, policy: &PolicyTable) -> Vec<String> {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut keywords: Vec<String> = Vec::new();
    for token in cleaned.split_whitespace() {
        if token.chars().count() < MIN_TOKEN_LEN {
            continue;
        }
        if policy.stop_words.iter().any(|s| s == token) {
            continue;
        }
        push_unique(&mut keywords, token);

        for cluster in &policy.topic_clusters {
            if cluster.triggers.iter().any(|t| t == token) {
                for term in &cluster.expansions {
                    push_unique(&mut keywords, term);
                }
            }
        }
    }
    keywords
}

fn push_unique(keywords: &mut Vec<String>, term: &str) {
    if !keywords.iter().any(|k| k == term) {
        keywords.push(term.to_string());
    }
}

// ============================================================================
// Relevance scoring
// ============================================================================

/// Score one episode against an expanded keyword set.
///
/// `position` is the episode's index in its channel's reverse-chronological
/// list (0 = newest) and feeds the bounded recency bonus. With an empty
/// keyword set the score is the recency bonus alone, which still gives the
/// context selector a deterministic ordering to fall back on.
pub fn score_episode(episode: &Episode, keywords: &[String], position: usize) -> RelevanceScore {
    // No signal: purely the recency bonus, so the fallback ordering is
    // deterministic and not biased toward episode length or format.
    if keywords.is_empty() {
        return RelevanceScore {
            episode_id: episode.id,
            score: recency_bonus(position),
            matched_keywords: Vec::new(),
        };
    }

    let title = episode.title.to_lowercase();
    // Markup never counts as a match: measure the same stripped text the
    // quality rules measure.
    let description = episode
        .description
        .as_deref()
        .map(|d| strip_html(d).to_lowercase())
        .unwrap_or_default();
    let transcript = episode.transcript.as_deref().map(str::to_lowercase);

    let mut score: i64 = 0;
    let mut matched: Vec<String> = Vec::new();

    for keyword in keywords {
        let mut hit = false;
        if title.contains(keyword.as_str()) {
            score += TITLE_MATCH_BONUS;
            hit = true;
        }
        if description.contains(keyword.as_str()) {
            score += DESCRIPTION_MATCH_BONUS;
            hit = true;
        }
        if let Some(ref text) = transcript {
            let occurrences = text.matches(keyword.as_str()).count() as i64;
            if occurrences > 0 {
                score += TRANSCRIPT_OCCURRENCE_BONUS * occurrences;
                hit = true;
            }
        }
        if hit {
            matched.push(keyword.clone());
        }
    }

    // Guest/interview episodes ground conversational queries well even when
    // the keyword overlap is thin.
    if title.contains("interview") || title.contains("guest") || title.contains("with ") {
        score += GUEST_TITLE_BONUS;
    }
    if description.contains("interview")
        || description.contains("guest")
        || description.contains("conversation")
    {
        score += GUEST_DESCRIPTION_BONUS;
    }

    if transcript
        .as_deref()
        .map(|t| t.chars().count() > LONG_FORM_TRANSCRIPT_CHARS)
        .unwrap_or(false)
    {
        score += LONG_FORM_BONUS;
    }

    score += recency_bonus(position);

    RelevanceScore {
        episode_id: episode.id,
        score,
        matched_keywords: matched,
    }
}

/// Bounded tie-break bonus: 5 for the newest episode, declining to 0.
pub fn recency_bonus(position: usize) -> i64 {
    MAX_RECENCY_BONUS.saturating_sub(position) as i64
}

/// Indices of `episodes` in reverse-chronological order. Episodes without a
/// publish timestamp sort last; id breaks remaining ties so the order is
/// total and deterministic.
pub fn recency_order(episodes: &[Episode]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..episodes.len()).collect();
    order.sort_by(|&a, &b| {
        let ea = &episodes[a];
        let eb = &episodes[b];
        match (ea.published_at, eb.published_at) {
            (Some(ta), Some(tb)) => tb.cmp(&ta).then(eb.id.cmp(&ea.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => eb.id.cmp(&ea.id),
        }
    });
    order
}

/// Score a whole corpus. Results come back in reverse-chronological order,
/// matching the positions used for the recency bonus.
pub fn score_corpus(episodes: &[Episode], keywords: &[String]) -> Vec<RelevanceScore> {
    recency_order(episodes)
        .into_iter()
        .enumerate()
        .map(|(position, idx)| score_episode(&episodes[idx], keywords, position))
        .collect()
}
