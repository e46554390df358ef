//! Branch prompt construction.
//!
//! One prompt per branch. Each prompt carries the decision, the mode's
//! weighting instruction, the category's real-world probability table as
//! JSON context, a per-index theme nudge, and the required response
//! schema. Pure string building — no I/O, no state.

use serde_json::{Map, Value, json};

use crate::classify::{self, DecisionCategory};
use crate::types::Mode;

const THEMES: [&str; 4] = [
    "The expected path",
    "The challenging but rewarding path",
    "The unexpected twist path",
    "The wildcard path",
];

fn mode_instruction(mode: Mode) -> &'static str {
    match mode {
        Mode::Realistic => {
            "Use realistic probabilities and likely outcomes based on real-world data."
        }
        Mode::FiftyFifty => "Give equal weight to positive and negative outcomes.",
        Mode::Random => "Include surprising, unlikely, or wildly improbable events.",
    }
}

/// Build the generation prompt for one branch.
pub fn branch_prompt(
    decision: &str,
    mode: Mode,
    branch_index: usize,
    category: DecisionCategory,
    total_branches: usize,
) -> String {
    let probs: Map<String, Value> = classify::probabilities(category)
        .iter()
        .map(|(name, p)| (name.to_string(), json!(p)))
        .collect();
    let probs_json =
        serde_json::to_string_pretty(&Value::Object(probs)).unwrap_or_else(|_| "{}".to_string());

    let theme = THEMES[branch_index % THEMES.len()];
    let instruction = mode_instruction(mode);

    format!(
        r#"Generate alternative life path #{number} of {total_branches} for this decision:
"{decision}"

Mode: {mode} - {instruction}

Consider these real-world probabilities for context:
{probs_json}

Create a unique branch that differs significantly from other branches.
Theme for this branch: {theme}

Return only JSON with this structure:
{{
    "title": "Brief branch title (5-7 words)",
    "story": "Narrative description of this life path (150-200 words)",
    "timeline": [
        {{"year": "Year 1", "event": "What happens"}},
        {{"year": "Year 3", "event": "Major milestone"}},
        {{"year": "Year 5", "event": "Outcome"}}
    ],
    "key_events": ["Event 1", "Event 2", "Event 3"],
    "probability_score": 0.5
}}
where probability_score is 0.0-1.0 based on likelihood."#,
        number = branch_index + 1,
    )
}
