//! Quality scoring, prioritization, and query grounding for episodic
//! media catalogs.
//!
//! Two independent pipelines over the same channel/episode snapshots:
//!
//! - **Scoring**: [`scoring::evaluate`] turns one episode into a
//!   [`model::ScoreResult`] (0–100 score, star rating, issue list);
//!   [`ranking::rank`] orders a batch of results for the optimization views.
//! - **Grounding**: [`relevance::expand`] builds a keyword set from a
//!   free-text query, [`relevance::score_episode`] measures match strength,
//!   and [`context::select`] assembles the bounded [`model::ContextDocument`]
//!   handed to an external text-generation collaborator.
//!
//! Everything here is a pure function of read-only snapshots — persistence,
//! feed ingestion, and presentation live in the surrounding application.
//! [`pipeline`] is the thin orchestration layer (parallel batch map, one
//! ordered sort, logging) that those collaborators call into.

pub mod context;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod policy;
pub mod ranking;
pub mod relevance;
pub mod scoring;

pub use error::OptimizerError;
pub use model::{
    Channel, ContextDocument, ContextEpisode, Episode, Issue, Medium, RelevanceScore, ScoreResult,
    Severity,
};
pub use pipeline::{build_context, evaluate_batch, prioritize_channel, prioritize_global};
pub use policy::PolicyTable;
pub use ranking::{rank, RankMode};
pub use relevance::expand;
pub use scoring::evaluate;
