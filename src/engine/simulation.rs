//! The simulation engine proper.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, instrument, warn};

use crate::classify::{self, DecisionCategory};
use crate::config::SecurityConfig;
use crate::fallback;
use crate::governor::RequestGovernor;
use crate::prompt;
use crate::sanitize;
use crate::types::{BranchPayload, LifeBranch, Mode, SimulationResult};
use crate::{Result, VerdandiError};

const POSITIVE_KEYWORDS: [&str; 7] = [
    "success", "happy", "achieve", "win", "love", "prosper", "fulfill",
];
const NEGATIVE_KEYWORDS: [&str; 6] = ["fail", "regret", "lose", "struggle", "miss", "difficult"];

/// Engine that generates, scores, and persists life-path simulations.
///
/// Holds the process-scoped governor (and with it the limiter, cache, and
/// monitor) plus the optional store. Cheap to share behind an `Arc`; all
/// methods take `&self`.
pub struct SimulationEngine {
    governor: RequestGovernor<BranchPayload>,
    security: SecurityConfig,
    #[cfg(feature = "storage")]
    store: Option<crate::store::SimulationStore>,
}

impl SimulationEngine {
    pub(crate) fn new(
        governor: RequestGovernor<BranchPayload>,
        security: SecurityConfig,
        #[cfg(feature = "storage")] store: Option<crate::store::SimulationStore>,
    ) -> Self {
        Self {
            governor,
            security,
            #[cfg(feature = "storage")]
            store,
        }
    }

    /// Run one simulation: sanitize the decision, generate `num_branches`
    /// branches through the governed request path, and score them.
    ///
    /// Never fails on provider trouble — rate-limit denials, failed
    /// fallback chains, and content-filtered input all degrade to
    /// deterministic local generation. The only errors are structural
    /// (none today, but the signature leaves room for the storage helpers
    /// sharing it).
    #[instrument(skip(self, decision))]
    pub async fn simulate(
        &self,
        decision: &str,
        mode: Mode,
        num_branches: usize,
    ) -> Result<SimulationResult> {
        let decision = sanitize::sanitize_decision(decision, self.security.max_input_length);

        let branches = match self.safety_reason(&decision) {
            Some(reason) => {
                warn!(reason, "decision failed the content gate, using safe branches");
                fallback::safe_branches(num_branches)
            }
            None => {
                let category = classify::classify_decision(&decision);
                let mut branches = Vec::with_capacity(num_branches);
                for index in 0..num_branches {
                    branches.push(
                        self.generate_branch(&decision, mode, index, category, num_branches)
                            .await,
                    );
                }
                branches
            }
        };

        let created_at = unix_now();
        Ok(SimulationResult {
            simulation_id: simulation_id(&decision, mode, created_at),
            decision,
            mode,
            branches,
            created_at,
            share_url: None,
        })
    }

    /// Generate a single branch, degrading to the procedural template when
    /// the governor yields nothing.
    async fn generate_branch(
        &self,
        decision: &str,
        mode: Mode,
        index: usize,
        category: DecisionCategory,
        total: usize,
    ) -> LifeBranch {
        let prompt = prompt::branch_prompt(decision, mode, index, category, total);
        let namespace = format!("{mode}/{index}");

        let payload = match self.governor.request(&prompt, &namespace).await {
            Ok(Some(mut payload)) => {
                if self.security.sanitize_outputs {
                    scrub_payload(&mut payload);
                }
                payload
            }
            Ok(None) => {
                info!(index, "no provider payload, generating procedurally");
                fallback::procedural_branch(decision, mode, index)
            }
            Err(VerdandiError::RateLimitExceeded { wait }) => {
                warn!(
                    index,
                    wait_secs = wait.as_secs_f64(),
                    "rate limited, generating procedurally"
                );
                fallback::procedural_branch(decision, mode, index)
            }
            Err(e) => {
                warn!(index, error = %e, "governed request failed, generating procedurally");
                fallback::procedural_branch(decision, mode, index)
            }
        };

        let fate_score = fate_score(&payload.key_events, mode, decision, index);
        LifeBranch::from_payload(index, payload, fate_score)
    }

    fn safety_reason(&self, decision: &str) -> Option<&'static str> {
        if !self.security.content_filtering {
            return None;
        }
        sanitize::check_content_safety(decision)
    }

    /// The governor, for limiter status, cache stats, and usage stats.
    pub fn governor(&self) -> &RequestGovernor<BranchPayload> {
        &self.governor
    }

    /// Persist a simulation. Errors when no store is configured.
    #[cfg(feature = "storage")]
    pub fn save(&self, result: &SimulationResult) -> Result<String> {
        let store = self.store()?;
        store.save(result)?;
        Ok(result.simulation_id.clone())
    }

    /// Load a simulation by id. Errors when no store is configured;
    /// `Ok(None)` when the id is unknown.
    #[cfg(feature = "storage")]
    pub fn load(&self, id: &str) -> Result<Option<SimulationResult>> {
        self.store()?.load(id)
    }

    /// Bump a simulation's share counter.
    #[cfg(feature = "storage")]
    pub fn record_share(&self, id: &str) -> Result<bool> {
        self.store()?.record_share(id)
    }

    #[cfg(feature = "storage")]
    fn store(&self) -> Result<&crate::store::SimulationStore> {
        self.store.as_ref().ok_or_else(|| {
            VerdandiError::Configuration("no simulation store configured".to_string())
        })
    }
}

/// Scrub model-produced text fields before they reach rendering or
/// persistence.
fn scrub_payload(payload: &mut BranchPayload) {
    payload.title = sanitize::sanitize_output(&payload.title);
    payload.story = sanitize::sanitize_output(&payload.story);
    for event in &mut payload.timeline {
        event.event = sanitize::sanitize_output(&event.event);
    }
    for event in &mut payload.key_events {
        *event = sanitize::sanitize_output(event);
    }
}

/// Keyword-derived outcome score: base 50, +5 per positive keyword
/// occurrence in the key events, -5 per negative, clamped to 0..=100.
/// Random mode adds a deterministic jitter in [-20, 20].
fn fate_score(key_events: &[String], mode: Mode, decision: &str, branch_index: usize) -> u8 {
    let mut score: i32 = 50;
    for event in key_events {
        let lower = event.to_lowercase();
        for keyword in POSITIVE_KEYWORDS {
            if lower.contains(keyword) {
                score += 5;
            }
        }
        for keyword in NEGATIVE_KEYWORDS {
            if lower.contains(keyword) {
                score -= 5;
            }
        }
    }

    if mode == Mode::Random {
        score += fallback::fate_jitter(decision, branch_index);
    }

    score.clamp(0, 100) as u8
}

/// Simulation id: hex digest of (decision, mode, creation time).
fn simulation_id(decision: &str, mode: Mode, created_at: i64) -> String {
    let mut hasher = DefaultHasher::new();
    decision.hash(&mut hasher);
    mode.as_str().hash(&mut hasher);
    created_at.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
