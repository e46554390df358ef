//! Deterministic procedural branch generation.
//!
//! The local generator of last resort: used when the governor returns no
//! payload (rate-limited, every candidate failed, or no providers are
//! configured) and for content-filtered input. Entirely deterministic —
//! where the narrative calls for variety it is derived from a hash of
//! (decision, branch index), never from an RNG — so the feature works
//! identically with zero providers and in tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::sanitize;
use crate::types::{BranchPayload, LifeBranch, Mode, TimelineEvent};

/// Number of distinct procedural templates; branch indices cycle through
/// them.
pub const TEMPLATE_COUNT: usize = 4;

/// Build the procedural branch for the given index.
///
/// Output text is passed through [`sanitize::sanitize_output`] so the
/// templates obey the same rendering contract as model output.
pub fn procedural_branch(decision: &str, mode: Mode, branch_index: usize) -> BranchPayload {
    let mut payload = template(decision, branch_index % TEMPLATE_COUNT);

    payload.probability_score = match mode {
        Mode::Realistic => payload.probability_score,
        Mode::FiftyFifty => 0.5,
        Mode::Random => pseudo_probability(decision, branch_index),
    };

    payload.story = sanitize::sanitize_output(&payload.story);
    for event in &mut payload.timeline {
        event.event = sanitize::sanitize_output(&event.event);
    }
    for event in &mut payload.key_events {
        *event = sanitize::sanitize_output(event);
    }

    payload
}

/// Neutral branches for content-filtered input: fixed upbeat content,
/// independent of the decision text.
pub fn safe_branches(num_branches: usize) -> Vec<LifeBranch> {
    (0..num_branches)
        .map(|i| LifeBranch {
            branch_id: i,
            title: format!("Path {}: A New Beginning", i + 1),
            story: "Every decision opens new doors. This path leads to personal growth \
                    and positive outcomes through dedication and perseverance."
                .to_string(),
            timeline: vec![
                TimelineEvent::new("Year 1", "Started fresh with new perspective"),
                TimelineEvent::new("Year 3", "Built meaningful connections"),
                TimelineEvent::new("Year 5", "Achieved personal milestone"),
            ],
            key_events: vec![
                "Fresh start".to_string(),
                "Personal growth".to_string(),
                "Positive outcome".to_string(),
            ],
            probability_score: 0.5,
            fate_score: 70,
        })
        .collect()
}

/// Fate-score jitter for random mode, in [-20, 20].
pub(crate) fn fate_jitter(decision: &str, branch_index: usize) -> i32 {
    (seed(decision, branch_index) % 41) as i32 - 20
}

/// Pseudo-probability in [0.1, 0.9] derived from the decision and index.
fn pseudo_probability(decision: &str, branch_index: usize) -> f64 {
    0.1 + (seed(decision, branch_index) % 801) as f64 / 1000.0
}

fn seed(decision: &str, branch_index: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    decision.hash(&mut hasher);
    branch_index.hash(&mut hasher);
    hasher.finish()
}

fn template(decision: &str, slot: usize) -> BranchPayload {
    match slot {
        0 => BranchPayload {
            title: "The Conventional Path".to_string(),
            story: format!(
                "You decided to {decision}. Things progressed as most would expect - \
                 some challenges, some victories, but overall a steady journey. Life \
                 unfolds with familiar rhythms, bringing both comfort and occasional \
                 wonder about the roads not taken."
            ),
            timeline: vec![
                TimelineEvent::new("Year 1", "Initial adjustment period with mixed results"),
                TimelineEvent::new("Year 3", "Established new routines and relationships"),
                TimelineEvent::new("Year 5", "Achieved moderate success and stability"),
            ],
            key_events: vec![
                "Found your footing".to_string(),
                "Built new connections".to_string(),
                "Reached equilibrium".to_string(),
            ],
            probability_score: 0.7,
        },
        1 => BranchPayload {
            title: "The Transformative Journey".to_string(),
            story: format!(
                "Your choice to {decision} catalyzed unexpected personal growth. \
                 Initial struggles gave way to profound discoveries about yourself. \
                 What seemed like a simple decision became a complete life \
                 transformation."
            ),
            timeline: vec![
                TimelineEvent::new("Year 1", "Difficult start but important lessons learned"),
                TimelineEvent::new("Year 3", "Breakthrough moment changes everything"),
                TimelineEvent::new("Year 5", "Living a completely different life than imagined"),
            ],
            key_events: vec![
                "Overcame major obstacle".to_string(),
                "Discovered hidden talent".to_string(),
                "Found true calling".to_string(),
            ],
            probability_score: 0.4,
        },
        2 => BranchPayload {
            title: "The Serendipitous Adventure".to_string(),
            story: format!(
                "After deciding to {decision}, life took surprising turns. A chance \
                 encounter led to unexpected opportunities. Sometimes the best \
                 outcomes come from the most unlikely circumstances."
            ),
            timeline: vec![
                TimelineEvent::new("Year 1", "Random encounter changes trajectory"),
                TimelineEvent::new("Year 3", "Pursuing opportunity you never expected"),
                TimelineEvent::new("Year 5", "Success in an entirely different field"),
            ],
            key_events: vec![
                "Met future mentor".to_string(),
                "Pivoted to new path".to_string(),
                "Achieved unexpected success".to_string(),
            ],
            probability_score: 0.3,
        },
        _ => BranchPayload {
            title: "The Wild Card Timeline".to_string(),
            story: format!(
                "Your decision to {decision} triggered a cascade of improbable \
                 events. Against all odds, you found yourself in situations that \
                 defy conventional wisdom. Life became stranger than fiction."
            ),
            timeline: vec![
                TimelineEvent::new("Year 1", "Bizarre coincidence alters course"),
                TimelineEvent::new("Year 3", "Became involved in something extraordinary"),
                TimelineEvent::new("Year 5", "Living a life no one could have predicted"),
            ],
            key_events: vec![
                "Won unlikely lottery".to_string(),
                "Became accidental celebrity".to_string(),
                "Changed the world".to_string(),
            ],
            probability_score: 0.1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_are_deterministic() {
        let a = procedural_branch("move to Lisbon", Mode::Random, 2);
        let b = procedural_branch("move to Lisbon", Mode::Random, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn templates_cycle_by_index() {
        let titles: Vec<String> = (0..5)
            .map(|i| procedural_branch("x", Mode::Realistic, i).title)
            .collect();
        assert_eq!(titles[0], titles[4]);
        assert_ne!(titles[0], titles[1]);
        assert_ne!(titles[1], titles[2]);
        assert_ne!(titles[2], titles[3]);
    }

    #[test]
    fn fifty_fifty_forces_even_odds() {
        let payload = procedural_branch("x", Mode::FiftyFifty, 0);
        assert_eq!(payload.probability_score, 0.5);
    }

    #[test]
    fn random_mode_probability_stays_in_range() {
        for i in 0..16 {
            let p = procedural_branch("try something", Mode::Random, i).probability_score;
            assert!((0.1..=0.9).contains(&p), "probability {p} out of range");
        }
    }

    #[test]
    fn decision_text_is_spliced_into_the_story() {
        let payload = procedural_branch("open a bakery", Mode::Realistic, 0);
        assert!(payload.story.contains("open a bakery"));
    }

    #[test]
    fn story_output_is_sanitized() {
        let payload = procedural_branch("<script>x</script>", Mode::Realistic, 0);
        assert!(!payload.story.contains("<script>"));
    }

    #[test]
    fn fate_jitter_bounds() {
        for i in 0..32 {
            let j = fate_jitter("anything", i);
            assert!((-20..=20).contains(&j), "jitter {j} out of range");
        }
    }

    #[test]
    fn safe_branches_have_fixed_shape() {
        let branches = safe_branches(3);
        assert_eq!(branches.len(), 3);
        assert!(branches[0].title.starts_with("Path 1"));
        assert_eq!(branches[2].fate_score, 70);
    }
}
