//! Suggestion application and the optimization pipeline.
//!
//! - [`applier`]: applies structured suggestions to a copy of a schedule
//! - [`engine`]: runs the detectors, ranks and applies their suggestions,
//!   and rescores the result
//!
//! The free functions use the stock configuration.

pub mod applier;
pub mod engine;


pub use applier::{apply_suggestions, apply_suggestions_with_report, ApplicationOutcome};
pub use engine::{OptimizationResult, OptimizationSummary, RulesEngine};

use crate::advisory::{Advisory, ComplexityAdvisory, ComplianceAdvisory};
use crate::models::{Schedule, Suggestion, Warning};

/// Optimize with the stock configuration.
///
/// Complexity data is accepted for interface parity; it does not change the
/// outcome.
pub fn optimize_schedule(
    schedule: &Schedule,
    _complexity: &Advisory<ComplexityAdvisory>,
    compliance: &Advisory<ComplianceAdvisory>,
) -> (Schedule, Vec<Suggestion>, Vec<Warning>) {
    RulesEngine::default().optimize_schedule(schedule, compliance)
}

pub fn generate_optimization_summary(
    original: &Schedule,
    optimized: &Schedule,
    suggestions: &[Suggestion],
) -> OptimizationSummary {
    RulesEngine::default().generate_optimization_summary(original, optimized, suggestions)
}
