//! Branch and simulation result types.

use serde::{Deserialize, Serialize};

use crate::types::Mode;

/// One dated event on a branch timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Rough point on the timeline, e.g. "Year 3".
    pub year: String,
    /// What happens there.
    pub event: String,
}

impl TimelineEvent {
    /// Convenience constructor.
    pub fn new(year: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            event: event.into(),
        }
    }
}

/// The structured payload a model must return for a single branch.
///
/// This is the shape the governor deserializes provider output into; a
/// response that does not match it counts as a failed attempt and advances
/// the fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchPayload {
    /// Short branch title (a handful of words).
    pub title: String,
    /// Narrative description of the path.
    pub story: String,
    /// Milestones over roughly five years.
    pub timeline: Vec<TimelineEvent>,
    /// Headline events, used for fate scoring.
    pub key_events: Vec<String>,
    /// Model-estimated likelihood in [0, 1].
    #[serde(default = "default_probability")]
    pub probability_score: f64,
}

fn default_probability() -> f64 {
    0.5
}

/// A fully scored alternate life path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeBranch {
    /// Zero-based index within the simulation.
    pub branch_id: usize,
    /// Short branch title.
    pub title: String,
    /// Narrative description of the path.
    pub story: String,
    /// Milestones over roughly five years.
    pub timeline: Vec<TimelineEvent>,
    /// Headline events.
    pub key_events: Vec<String>,
    /// Estimated likelihood in [0, 1].
    pub probability_score: f64,
    /// Keyword-derived outcome score in 0..=100.
    pub fate_score: u8,
}

impl LifeBranch {
    /// Build a branch from a payload plus the engine-computed fate score.
    pub fn from_payload(branch_id: usize, payload: BranchPayload, fate_score: u8) -> Self {
        Self {
            branch_id,
            title: payload.title,
            story: payload.story,
            timeline: payload.timeline,
            key_events: payload.key_events,
            probability_score: payload.probability_score,
            fate_score,
        }
    }
}

/// Complete result of one simulation run, persisted and retrieved by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Stable identifier used as the persistence key.
    pub simulation_id: String,
    /// The sanitized decision that seeded the simulation.
    pub decision: String,
    /// Mode the branches were generated under.
    pub mode: Mode,
    /// Generated branches, in index order.
    pub branches: Vec<LifeBranch>,
    /// Creation time as unix seconds.
    pub created_at: i64,
    /// Share link, if one has been minted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}
