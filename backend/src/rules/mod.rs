//! Rule-based detectors.
//!
//! Every detector is a pure function of the schedule and the configuration.
//! Detectors never mutate their input and never see each other's output.
//!
//! - [`redundancy`]: repeated assessments and overloaded safety panels
//! - [`consolidation`]: adjacent visits that can be merged or made mergeable
//! - [`feasibility`]: practical warnings plus pass-through of advisory warnings
//! - [`remote`]: visits or assessments that can move off-site
//! - [`timing`]: narrow windows and closely spaced intensive visits

pub mod consolidation;
pub mod feasibility;
pub mod redundancy;
pub mod remote;
pub mod timing;


pub use consolidation::ConsolidationDetector;
pub use feasibility::check_logistical_feasibility;
pub use redundancy::RedundancyDetector;
pub use remote::RemoteOpportunityDetector;
pub use timing::TimingDetector;

use crate::config::EngineConfig;
use crate::models::{Schedule, Suggestion};

/// A rule that proposes schedule changes.
pub trait SuggestionDetector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn detect(&self, schedule: &Schedule, config: &EngineConfig) -> Vec<Suggestion>;
}

/// The suggestion detectors in the order their output is concatenated.
pub fn default_detectors() -> Vec<Box<dyn SuggestionDetector>> {
    vec![
        Box::new(RedundancyDetector),
        Box::new(ConsolidationDetector),
        Box::new(RemoteOpportunityDetector),
        Box::new(TimingDetector),
    ]
}

/// Run `detectors` in order and concatenate their suggestions, unranked.
pub fn detect_all(
    detectors: &[Box<dyn SuggestionDetector>],
    schedule: &Schedule,
    config: &EngineConfig,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    for detector in detectors {
        let found = detector.detect(schedule, config);
        log::debug!("{} detector produced {} suggestion(s)", detector.name(), found.len());
        suggestions.extend(found);
    }
    suggestions
}
