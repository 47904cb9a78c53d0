//! Thin orchestration over the pure engines.
//!
//! Batch evaluation is an embarrassingly parallel map over the episode
//! list followed by one deterministic sort; this module owns that two-phase
//! structure, the exclusion filtering, and the logging. The pure functions
//! underneath never log and never fail.


use crate::context;
use crate::model::{Channel, ContextDocument, Episode, ScoreResult};
use crate::policy::PolicyTable;
use crate::ranking::{rank, RankMode};
use crate::relevance::expand;
use crate::scoring::evaluate;
use rayon::prelude::*;

/// Evaluate every non-excluded episode of one channel in parallel.
///
/// Results come back in input order: rayon's indexed collect preserves it,
/// and the ranker's stable tie-break depends on that. One malformed episode
/// degrades to a low-scoring result, never a dropped one.
pub fn evaluate_batch(episodes: &[Episode], policy: &PolicyTable) -> Vec<ScoreResult> {
    let active: Vec<&Episode> = episodes.iter().filter(|e| !e.excluded).collect();
    active
        .par_iter()
        .map(|&episode| evaluate(episode, policy))
        .collect()
}

/// Score and rank one channel's episodes.
pub fn prioritize_channel(
    channel: &Channel,
    episodes: &[Episode],
    mode: RankMode,
    policy: &PolicyTable,
) -> Vec<ScoreResult> {
    let results = evaluate_batch(episodes, policy);
    log::info!(
        "Scored {} of {} episodes for channel {} ({}), ranking {}",
        results.len(),
        episodes.len(),
        channel.id,
        channel.name,
        mode
    );
    rank(results, mode)
}

/// Score every channel's corpus and rank the union for the global
/// optimization view. One channel per task, improvement-weighted order.
pub fn prioritize_global(
    corpora: &[(Channel, Vec<Episode>)],
    policy: &PolicyTable,
) -> Vec<ScoreResult> {
    let all: Vec<ScoreResult> = corpora
        .par_iter()
        .map(|(_, episodes)| evaluate_batch(episodes, policy))
        .collect::<Vec<Vec<ScoreResult>>>()
        .into_iter()
        .flatten()
        .collect();

    log::info!(
        "Global prioritization: {} results across {} channels",
        all.len(),
        corpora.len()
    );

    rank(all, RankMode::ImprovementWeighted)
}

/// Expand a free-text query and build the grounding document for one
/// channel. The document goes to the text-generation collaborator as-is;
/// wrapping that call with timeouts and retries is the caller's concern.
pub fn build_context(
    channel: &Channel,
    episodes: &[Episode],
    query: &str,
    policy: &PolicyTable,
) -> ContextDocument {
    let keywords = expand(query, policy);
    let active: Vec<Episode> = episodes.iter().filter(|e| !e.excluded).cloned().collect();

    if keywords.is_empty() {
        log::info!(
            "Query expanded to no keywords for channel {}; falling back to recency",
            channel.id
        );
    }

    let doc = context::select(channel, &active, &keywords);
    log::info!(
        "Context for channel {}: {} of {} episodes selected ({} keywords expanded, {} matched)",
        channel.id,
        doc.selected_count,
        doc.corpus_size,
        keywords.len(),
        doc.keywords.len()
    );
    doc
}
