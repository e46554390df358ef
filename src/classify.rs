//! Decision classification and real-world probability context.
//!
//! A decision is bucketed into a category by keyword matching, and each
//! category carries a small table of real-world outcome probabilities that
//! is fed to the model as prompt context (and used directly in realistic
//! mode).

use serde::Serialize;

/// Life-decision category for probability lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    CareerRelocation,
    EducationChoices,
    Entrepreneurship,
    RelationshipDecisions,
    LifestyleChanges,
    FinancialDecisions,
}

impl DecisionCategory {
    /// Stable key used in prompts and stats.
    pub fn key(&self) -> &'static str {
        match self {
            DecisionCategory::CareerRelocation => "career_relocation",
            DecisionCategory::EducationChoices => "education_choices",
            DecisionCategory::Entrepreneurship => "entrepreneurship",
            DecisionCategory::RelationshipDecisions => "relationship_decisions",
            DecisionCategory::LifestyleChanges => "lifestyle_changes",
            DecisionCategory::FinancialDecisions => "financial_decisions",
        }
    }
}

/// Classify a decision by keyword matching.
///
/// Checks run in a fixed order and the first match wins; anything
/// unmatched falls back to career relocation, the broadest category.
pub fn classify_decision(decision: &str) -> DecisionCategory {
    let lower = decision.to_lowercase();
    let matches_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if matches_any(&["move", "relocate", "city", "country"]) {
        DecisionCategory::CareerRelocation
    } else if matches_any(&["study", "degree", "university", "college"]) {
        DecisionCategory::EducationChoices
    } else if matches_any(&["start", "business", "company", "startup"]) {
        DecisionCategory::Entrepreneurship
    } else if matches_any(&["marry", "relationship", "divorce", "date"]) {
        DecisionCategory::RelationshipDecisions
    } else if matches_any(&["habit", "fitness", "diet", "meditat"]) {
        DecisionCategory::LifestyleChanges
    } else if matches_any(&["invest", "debt", "budget", "savings"]) {
        DecisionCategory::FinancialDecisions
    } else {
        DecisionCategory::CareerRelocation
    }
}

/// Real-world outcome probabilities for a category.
pub fn probabilities(category: DecisionCategory) -> &'static [(&'static str, f64)] {
    match category {
        DecisionCategory::CareerRelocation => &[
            ("job_satisfaction_increase", 0.67),
            ("salary_increase", 0.58),
            ("adaptation_success", 0.73),
            ("regret_within_2_years", 0.22),
            ("career_advancement", 0.61),
            ("networking_expansion", 0.84),
        ],
        DecisionCategory::EducationChoices => &[
            ("degree_completion", 0.64),
            ("employment_in_field", 0.57),
            ("positive_roi_5_years", 0.71),
            ("career_pivot_success", 0.43),
            ("satisfaction_with_choice", 0.68),
        ],
        DecisionCategory::Entrepreneurship => &[
            ("business_survival_1_year", 0.80),
            ("business_survival_5_years", 0.50),
            ("profitability_year_1", 0.40),
            ("scale_to_10_employees", 0.23),
            ("exit_opportunity", 0.12),
            ("personal_fulfillment", 0.76),
        ],
        DecisionCategory::RelationshipDecisions => &[
            ("marriage_success_10_years", 0.67),
            ("cohabitation_to_marriage", 0.60),
            ("long_distance_survival", 0.42),
            ("friendship_maintenance", 0.55),
            ("family_approval", 0.73),
        ],
        DecisionCategory::LifestyleChanges => &[
            ("habit_formation_success", 0.21),
            ("fitness_goal_achievement", 0.33),
            ("diet_adherence_6_months", 0.20),
            ("meditation_practice_sustained", 0.15),
            ("work_life_balance_improvement", 0.48),
        ],
        DecisionCategory::FinancialDecisions => &[
            ("investment_positive_return", 0.68),
            ("debt_payoff_on_schedule", 0.52),
            ("emergency_fund_maintained", 0.37),
            ("budget_adherence", 0.29),
            ("income_increase_from_skill", 0.64),
        ],
    }
}

/// Probability of a specific outcome within a category; unknown outcomes
/// resolve to 0.5.
pub fn probability(category: DecisionCategory, outcome: &str) -> f64 {
    probabilities(category)
        .iter()
        .find(|(name, _)| *name == outcome)
        .map(|(_, p)| *p)
        .unwrap_or(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocation_keywords() {
        assert_eq!(
            classify_decision("What if I moved to Berlin?"),
            DecisionCategory::CareerRelocation
        );
    }

    #[test]
    fn education_keywords() {
        assert_eq!(
            classify_decision("what if I went back to university"),
            DecisionCategory::EducationChoices
        );
    }

    #[test]
    fn entrepreneurship_keywords() {
        assert_eq!(
            classify_decision("quit my job and found a startup"),
            DecisionCategory::Entrepreneurship
        );
    }

    #[test]
    fn relationship_keywords() {
        assert_eq!(
            classify_decision("what if I never got a divorce"),
            DecisionCategory::RelationshipDecisions
        );
    }

    #[test]
    fn unmatched_defaults_to_relocation() {
        assert_eq!(
            classify_decision("what if I learned the violin"),
            DecisionCategory::CareerRelocation
        );
    }

    #[test]
    fn probability_lookup() {
        let p = probability(DecisionCategory::Entrepreneurship, "business_survival_5_years");
        assert!((p - 0.50).abs() < 1e-9);
        // unknown outcome falls back to a coin flip
        assert_eq!(probability(DecisionCategory::Entrepreneurship, "nonsense"), 0.5);
    }
}
