use crate::config::EngineConfig;
use crate::models::{day_gap, Difficulty, Schedule, Suggestion, SuggestionAction, VisitTarget};

use super::SuggestionDetector;

/// Looks at each pair of day-adjacent visits and proposes merging them, or
/// widening their windows when they are too far apart to merge as is.
///
/// At most one suggestion is produced per pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolidationDetector;

impl SuggestionDetector for ConsolidationDetector {
    fn name(&self) -> &'static str {
        "consolidation"
    }

    fn detect(&self, schedule: &Schedule, config: &EngineConfig) -> Vec<Suggestion> {
        let rules = &config.rules;
        let visits = schedule.visits_by_day();
        let mut suggestions = Vec::new();

        for pair in visits.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let gap = day_gap(current, next);
            if gap <= 0 || gap > i64::from(rules.consolidation_max_gap_days) {
                continue;
            }

            let combined_minutes =
                current.total_duration_minutes() + next.total_duration_minutes();
            let both_fasting = current.requires_fasting() && next.requires_fasting();

            if combined_minutes < rules.consolidation_max_minutes && !both_fasting {
                suggestions.push(Suggestion::new(
                    SuggestionAction::Consolidate {
                        first: VisitTarget::named(&current.name),
                        second: VisitTarget::named(&next.name),
                        min_window_days: rules.consolidated_min_window_days,
                    },
                    format!("Combine {} and {}", current.name, next.name),
                    format!(
                        "Reduces visits by 1, saves ~{:.1} hours travel time",
                        config.patient.travel_hours_per_visit
                    ),
                    rules.consolidation_reduction,
                    Difficulty::Moderate,
                ));
            } else if gap > i64::from(rules.window_expansion_min_gap_days)
                && (current.window_days_after < rules.narrow_window_days
                    || next.window_days_before < rules.narrow_window_days)
            {
                suggestions.push(Suggestion::new(
                    SuggestionAction::ExpandWindows {
                        targets: vec![
                            VisitTarget::named(&current.name),
                            VisitTarget::named(&next.name),
                        ],
                        days: rules.expanded_window_days,
                    },
                    format!(
                        "Expand visit windows to allow combination of {} and {}",
                        current.name, next.name
                    ),
                    "Increases scheduling flexibility for sites and patients",
                    rules.window_expansion_reduction,
                    Difficulty::Easy,
                ));
            }
        }

        suggestions
    }
}
