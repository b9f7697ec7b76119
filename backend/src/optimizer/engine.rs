use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, ComplexityAdvisory, ComplianceAdvisory};
use crate::burden::{compare_burden_scores, BurdenCalculator};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{
    BurdenHotspot, BurdenScore, Schedule, SiteBurdenScore, Suggestion, SuggestionKind, Warning,
};
use crate::rules::{check_logistical_feasibility, default_detectors, detect_all, SuggestionDetector};
use crate::validation::ensure_valid;

use super::applier::{apply_suggestions_with_report, rank_and_apply, ApplicationOutcome};

/// Number of top-ranked suggestions reported as applied.
pub const REPORTED_SUGGESTIONS_LIMIT: usize = 5;

/// Change metrics between an original and an optimized schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSummary {
    pub visits_consolidated: i64,
    pub assessments_eliminated: i64,
    pub remote_conversions: usize,
    pub burden_reduction_percentage: f64,
    pub time_saved_hours: f64,
    pub travel_visits_saved: i64,
    /// Top-ranked suggestions, capped for reporting.
    pub suggestions_applied: usize,
    /// Suggestions that actually changed the schedule.
    pub suggestions_effective: usize,
    pub total_suggestions: usize,
}

/// Everything produced by one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original_schedule: Schedule,
    pub optimized_schedule: Schedule,
    pub original_patient_burden: BurdenScore,
    pub optimized_patient_burden: BurdenScore,
    pub original_site_burden: SiteBurdenScore,
    pub optimized_site_burden: SiteBurdenScore,
    pub suggestions: Vec<Suggestion>,
    pub application: Vec<ApplicationOutcome>,
    pub warnings: Vec<Warning>,
    pub improvement_percentage: f64,
    pub summary: String,
    pub hotspots: Vec<BurdenHotspot>,
    pub change_summary: OptimizationSummary,
    pub complexity: Advisory<ComplexityAdvisory>,
}

/// Single-pass optimizer: detect, rank, apply, rescore.
///
/// Holds no per-run state, so one engine can serve concurrent callers.
pub struct RulesEngine {
    config: EngineConfig,
    calculator: BurdenCalculator,
    detectors: Vec<Box<dyn SuggestionDetector>>,
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            calculator: BurdenCalculator::default(),
            detectors: default_detectors(),
        }
    }
}

impl RulesEngine {
    /// Build an engine from a configuration, validating it first.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            calculator: BurdenCalculator::new(&config),
            detectors: default_detectors(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculator(&self) -> &BurdenCalculator {
        &self.calculator
    }

    /// Detect, rank and apply. The input is never modified.
    ///
    /// Returns the optimized schedule, the ranked suggestions and the
    /// feasibility warnings. Assumes validated input.
    pub fn optimize_schedule(
        &self,
        schedule: &Schedule,
        compliance: &Advisory<ComplianceAdvisory>,
    ) -> (Schedule, Vec<Suggestion>, Vec<Warning>) {
        let (optimized, suggestions, warnings, _) = self.run(schedule, compliance);
        (optimized, suggestions, warnings)
    }

    fn run(
        &self,
        schedule: &Schedule,
        compliance: &Advisory<ComplianceAdvisory>,
    ) -> (Schedule, Vec<Suggestion>, Vec<Warning>, Vec<ApplicationOutcome>) {
        let mut suggestions = detect_all(&self.detectors, schedule, &self.config);
        let warnings = check_logistical_feasibility(schedule, &self.config.rules, compliance);

        log::info!(
            "protocol {}: {} suggestion(s), {} warning(s)",
            schedule.protocol_name,
            suggestions.len(),
            warnings.len()
        );

        let (optimized, outcomes) = rank_and_apply(schedule, &mut suggestions);

        log::info!(
            "protocol {}: {} visit(s) -> {} visit(s)",
            schedule.protocol_name,
            schedule.visits.len(),
            optimized.visits.len()
        );

        (optimized, suggestions, warnings, outcomes)
    }

    /// Validate, optimize and score a schedule.
    ///
    /// Fails only when the schedule does not pass validation. Unusable
    /// advisory data is logged and ignored.
    pub fn optimize(
        &self,
        schedule: &Schedule,
        complexity: Advisory<ComplexityAdvisory>,
        compliance: Advisory<ComplianceAdvisory>,
    ) -> EngineResult<OptimizationResult> {
        ensure_valid(schedule)?;

        if let Advisory::Unavailable(reason) = &complexity {
            log::info!("complexity advisory unavailable: {}", reason);
        }

        let (optimized, suggestions, warnings, application) = self.run(schedule, &compliance);

        let original_patient = self.calculator.calculate_patient_burden(schedule);
        let optimized_patient = self.calculator.calculate_patient_burden(&optimized);
        let original_site = self.calculator.calculate_site_burden(schedule);
        let optimized_site = self.calculator.calculate_site_burden(&optimized);
        let (improvement, summary) = compare_burden_scores(&original_patient, &optimized_patient);

        let effective = application.iter().filter(|o| o.is_applied()).count();
        let change_summary = self.summarize(schedule, &optimized, &suggestions, effective);
        let hotspots = self.calculator.identify_burden_hotspots(schedule);

        Ok(OptimizationResult {
            original_schedule: schedule.clone(),
            optimized_schedule: optimized,
            original_patient_burden: original_patient,
            optimized_patient_burden: optimized_patient,
            original_site_burden: original_site,
            optimized_site_burden: optimized_site,
            suggestions,
            application,
            warnings,
            improvement_percentage: improvement,
            summary,
            hotspots,
            change_summary,
            complexity,
        })
    }

    /// Change metrics between `original` and `optimized`.
    ///
    /// `suggestions_effective` is found by replaying `suggestions` against
    /// `original`.
    pub fn generate_optimization_summary(
        &self,
        original: &Schedule,
        optimized: &Schedule,
        suggestions: &[Suggestion],
    ) -> OptimizationSummary {
        let (_, outcomes) = apply_suggestions_with_report(original, suggestions);
        let effective = outcomes.iter().filter(|o| o.is_applied()).count();
        self.summarize(original, optimized, suggestions, effective)
    }

    fn summarize(
        &self,
        original: &Schedule,
        optimized: &Schedule,
        suggestions: &[Suggestion],
        effective: usize,
    ) -> OptimizationSummary {
        let original_burden = self.calculator.calculate_patient_burden(original);
        let optimized_burden = self.calculator.calculate_patient_burden(optimized);
        let (reduction, _) = compare_burden_scores(&original_burden, &optimized_burden);

        OptimizationSummary {
            visits_consolidated: original.visits.len() as i64 - optimized.visits.len() as i64,
            assessments_eliminated: original.total_assessments() as i64
                - optimized.total_assessments() as i64,
            remote_conversions: suggestions
                .iter()
                .filter(|s| s.kind == SuggestionKind::RemoteConversion)
                .count(),
            burden_reduction_percentage: round1(reduction),
            time_saved_hours: round1(
                original_burden.patient_time_hours - optimized_burden.patient_time_hours,
            ),
            travel_visits_saved: original_burden.patient_travel_count as i64
                - optimized_burden.patient_travel_count as i64,
            suggestions_applied: suggestions.len().min(REPORTED_SUGGESTIONS_LIMIT),
            suggestions_effective: effective,
            total_suggestions: suggestions.len(),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
