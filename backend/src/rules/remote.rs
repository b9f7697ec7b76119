use crate::config::EngineConfig;
use crate::models::{Difficulty, Schedule, Suggestion, SuggestionAction, VisitTarget};

use super::SuggestionDetector;

/// Proposes remote conversion for visits whose assessments can be done
/// off-site, wholly or in part.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteOpportunityDetector;

impl SuggestionDetector for RemoteOpportunityDetector {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn detect(&self, schedule: &Schedule, config: &EngineConfig) -> Vec<Suggestion> {
        let rules = &config.rules;
        let mut suggestions = Vec::new();

        for visit in &schedule.visits {
            let eligible: Vec<&str> = visit
                .assessments
                .iter()
                .filter(|a| a.can_be_done_remotely)
                .map(|a| a.name.as_str())
                .collect();

            if eligible.is_empty() {
                continue;
            }

            let action = SuggestionAction::ConvertToRemote {
                target: VisitTarget::named(&visit.name),
            };

            if eligible.len() == visit.assessments.len() {
                suggestions.push(Suggestion::new(
                    action,
                    format!("Convert {} to remote/telemedicine visit", visit.name),
                    format!(
                        "Eliminates travel burden, saves {:.1} hours",
                        config.patient.travel_hours_per_visit
                    ),
                    rules.full_remote_reduction,
                    Difficulty::Moderate,
                ));
            } else {
                suggestions.push(Suggestion::new(
                    action,
                    format!("Perform {} remotely for {}", eligible.join(", "), visit.name),
                    "Reduces on-site time and complexity",
                    rules.partial_remote_reduction,
                    Difficulty::Easy,
                ));
            }
        }

        suggestions
    }
}
