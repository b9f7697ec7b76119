use crate::config::{EngineConfig, RuleConfig};
use crate::models::{day_gap, Difficulty, Schedule, Suggestion, SuggestionAction, Visit, VisitTarget};

use super::SuggestionDetector;

/// Narrow visit windows and intensive visits packed too closely together.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingDetector;

impl SuggestionDetector for TimingDetector {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn detect(&self, schedule: &Schedule, config: &EngineConfig) -> Vec<Suggestion> {
        let rules = &config.rules;
        let mut suggestions = detect_narrow_windows(schedule, rules);
        suggestions.extend(detect_intensive_clustering(schedule, rules));
        suggestions
    }
}

/// Treatment and follow-up visits whose combined window is too tight.
/// Screening and baseline visits are exempt.
pub fn detect_narrow_windows(schedule: &Schedule, rules: &RuleConfig) -> Vec<Suggestion> {
    schedule
        .visits
        .iter()
        .filter(|v| !v.is_screening && !v.is_baseline)
        .filter(|v| v.total_window_days() < i64::from(rules.min_total_window_days))
        .map(|v| {
            Suggestion::new(
                SuggestionAction::ExpandWindows {
                    targets: vec![VisitTarget::named(&v.name)],
                    days: rules.expanded_window_days,
                },
                format!("Expand {} window to ±3-5 days", v.name),
                "Improves scheduling flexibility and reduces missed visits",
                rules.window_reduction,
                Difficulty::Easy,
            )
        })
        .collect()
}

pub fn is_intensive(visit: &Visit, rules: &RuleConfig) -> bool {
    visit.invasive_procedure_count() > rules.intensive_invasive_above
        || visit.total_duration_minutes() > rules.intensive_minutes_above
}

/// First pair of day-adjacent intensive visits closer than the minimum
/// spacing. The later visit of the pair is the one to move.
pub fn detect_intensive_clustering(schedule: &Schedule, rules: &RuleConfig) -> Option<Suggestion> {
    let mut intensive: Vec<&Visit> = schedule
        .visits
        .iter()
        .filter(|v| is_intensive(v, rules))
        .collect();
    intensive.sort_by_key(|v| v.day);

    intensive
        .windows(2)
        .find(|pair| day_gap(pair[0], pair[1]) < i64::from(rules.intensive_min_spacing_days))
        .map(|pair| {
            let (earlier, later) = (pair[0], pair[1]);
            Suggestion::new(
                SuggestionAction::IncreaseSpacing {
                    target: VisitTarget::named(&later.name),
                    min_gap_days: rules.intensive_min_spacing_days,
                },
                format!("Increase spacing between {} and {}", earlier.name, later.name),
                "Allows patient recovery time between intensive procedures",
                rules.spacing_reduction,
                Difficulty::Moderate,
            )
            .with_visits_affected(vec![earlier.name.clone(), later.name.clone()])
        })
}
