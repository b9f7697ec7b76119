use crate::config::{EngineConfig, RuleConfig};
use crate::models::{
    AssessmentCategory, Difficulty, Schedule, Suggestion, SuggestionAction, VisitTarget,
};

use super::SuggestionDetector;

/// Flags assessments repeated at short intervals and visits with more
/// safety labs than needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedundancyDetector;

impl SuggestionDetector for RedundancyDetector {
    fn name(&self) -> &'static str {
        "redundancy"
    }

    fn detect(&self, schedule: &Schedule, config: &EngineConfig) -> Vec<Suggestion> {
        let rules = &config.rules;
        let mut suggestions = detect_redundant_assessments(schedule, rules);
        suggestions.extend(detect_safety_overload(schedule, rules));
        suggestions
    }
}

/// One suggestion per (category, name) group with enough occurrences, naming
/// the later day of the first pair that falls inside the redundancy window.
/// Groups are visited in first-seen order.
pub fn detect_redundant_assessments(schedule: &Schedule, rules: &RuleConfig) -> Vec<Suggestion> {
    let mut groups: Vec<((AssessmentCategory, &str), Vec<i32>)> = Vec::new();

    for visit in &schedule.visits {
        for assessment in &visit.assessments {
            let key = (assessment.category, assessment.name.as_str());
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, days)) => days.push(visit.day),
                None => groups.push((key, vec![visit.day])),
            }
        }
    }

    let mut suggestions = Vec::new();
    for ((category, name), mut days) in groups {
        if days.len() < rules.redundancy_min_occurrences {
            continue;
        }
        days.sort_unstable();

        let repeated = days
            .windows(2)
            .find(|pair| i64::from(pair[1]) - i64::from(pair[0]) < i64::from(rules.redundancy_window_days))
            .map(|pair| pair[1]);

        if let Some(day) = repeated {
            suggestions.push(Suggestion::new(
                SuggestionAction::RemoveAssessment {
                    target: VisitTarget::OnDay(day),
                    category,
                    name: name.to_string(),
                },
                format!("Remove redundant {} on Day {}", name, day),
                format!("Reduces {} frequency without losing key data points", category),
                rules.redundancy_reduction,
                Difficulty::Easy,
            ));
        }
    }
    suggestions
}

/// Non-baseline visits carrying more safety assessments than allowed.
pub fn detect_safety_overload(schedule: &Schedule, rules: &RuleConfig) -> Vec<Suggestion> {
    schedule
        .visits
        .iter()
        .filter(|visit| !visit.is_baseline)
        .filter(|visit| {
            visit
                .assessments
                .iter()
                .filter(|a| a.category.is_safety())
                .count()
                > rules.safety_max_per_visit
        })
        .map(|visit| {
            Suggestion::new(
                SuggestionAction::StreamlineSafety {
                    target: VisitTarget::named(&visit.name),
                },
                format!("Streamline safety assessments on {}", visit.name),
                "Maintain safety monitoring with reduced redundancy",
                rules.streamline_reduction,
                Difficulty::Moderate,
            )
        })
        .collect()
}
