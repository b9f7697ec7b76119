//! Structural validation of incoming schedules.
//!
//! The burden calculator and the rule detectors assume validated input.
//! Callers run [`validate_schedule`] (or [`ensure_valid`]) at the boundary so
//! out-of-range values are rejected before they reach scoring.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult, ErrorContext};
use crate::models::Schedule;

/// Highest allowed `patient_discomfort_level`.
pub const MAX_DISCOMFORT_LEVEL: i32 = 10;

/// Largest accepted `|day|` and `total_duration_days`.
pub const MAX_ABS_DAY: i32 = 100_000;

/// Largest accepted value of either visit window field.
pub const MAX_WINDOW_DAYS: i32 = 365;

/// Validation outcome with categorized issues and statistics.
///
/// Errors make `is_valid` false; warnings are informational only.
///
/// # Examples
///
/// ```
/// use trial_burden::validation::ValidationReport;
///
/// let mut report = ValidationReport::new();
/// assert!(report.is_valid);
///
/// report.add_error("Visit 'Day 1': negative duration".to_string());
/// assert!(!report.is_valid);
/// assert_eq!(report.errors.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Counts gathered while validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_visits: usize,
    pub total_assessments: usize,
    pub empty_visits: usize,
    pub duplicate_visit_ids: usize,
    pub visits_beyond_duration: usize,
    pub invalid_durations: usize,
    pub invalid_discomfort_levels: usize,
    pub invalid_costs: usize,
    pub invalid_windows: usize,
    pub invalid_days: usize,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the report as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a schedule.
///
/// Errors: empty protocol or visit names, study duration outside
/// `0..=MAX_ABS_DAY`, phase not in 1..=4, visit days outside
/// `-MAX_ABS_DAY..=MAX_ABS_DAY`, windows outside `0..=MAX_WINDOW_DAYS`,
/// negative assessment durations or costs, and discomfort levels outside 1..=10.
///
/// Warnings: duplicate visit ids, visits after `total_duration_days`, and
/// visits with no assessments.
///
/// # Examples
///
/// ```
/// use trial_burden::models::{Assessment, AssessmentCategory, Schedule, Visit};
/// use trial_burden::validation::validate_schedule;
///
/// let visit = Visit::new(
///     "Day 1",
///     1,
///     vec![Assessment::new("Vitals", AssessmentCategory::VitalSigns, 10)],
/// );
/// let schedule = Schedule::new("ABC-123", "oncology", "2", 84, vec![visit]);
///
/// let report = validate_schedule(&schedule);
/// assert!(report.is_valid);
/// assert_eq!(report.stats.total_assessments, 1);
/// ```
pub fn validate_schedule(schedule: &Schedule) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.stats.total_visits = schedule.visits.len();
    report.stats.total_assessments = schedule.total_assessments();

    if schedule.protocol_name.trim().is_empty() {
        report.add_error("Schedule is missing protocol_name".to_string());
    }
    if !(0..=MAX_ABS_DAY).contains(&schedule.total_duration_days) {
        report.add_error(format!(
            "total_duration_days must be 0 to {}, got {}",
            MAX_ABS_DAY, schedule.total_duration_days
        ));
    }
    if !is_known_phase(&schedule.phase) {
        report.add_error(format!(
            "phase must be 1 to 4, got '{}'",
            schedule.phase
        ));
    }

    let mut seen_ids = HashSet::new();

    for (idx, visit) in schedule.visits.iter().enumerate() {
        let label = if visit.name.trim().is_empty() {
            report.add_error(format!("Visit at index {} is missing a name", idx));
            format!("#{}", idx)
        } else {
            visit.name.clone()
        };

        if let Some(id) = &visit.id {
            if !seen_ids.insert(id.as_str()) {
                report.stats.duplicate_visit_ids += 1;
                report.add_warning(format!("Duplicate visit id '{}' on visit '{}'", id, label));
            }
        }

        let window_range = 0..=MAX_WINDOW_DAYS;
        if !window_range.contains(&visit.window_days_before)
            || !window_range.contains(&visit.window_days_after)
        {
            report.stats.invalid_windows += 1;
            report.add_error(format!(
                "Visit '{}': window days must be 0 to {} (before={}, after={})",
                label, MAX_WINDOW_DAYS, visit.window_days_before, visit.window_days_after
            ));
        }

        if !(-MAX_ABS_DAY..=MAX_ABS_DAY).contains(&visit.day) {
            report.stats.invalid_days += 1;
            report.add_error(format!(
                "Visit '{}': day must be within +/-{}, got {}",
                label, MAX_ABS_DAY, visit.day
            ));
        }

        if visit.day > schedule.total_duration_days {
            report.stats.visits_beyond_duration += 1;
            report.add_warning(format!(
                "Visit '{}' on day {} falls after the study end (day {})",
                label, visit.day, schedule.total_duration_days
            ));
        }

        if visit.assessments.is_empty() {
            report.stats.empty_visits += 1;
            report.add_warning(format!("Visit '{}' has no assessments", label));
        }

        for assessment in &visit.assessments {
            if assessment.name.trim().is_empty() {
                report.add_error(format!("Visit '{}': assessment is missing a name", label));
            }
            if assessment.duration_minutes < 0 {
                report.stats.invalid_durations += 1;
                report.add_error(format!(
                    "Visit '{}', assessment '{}': duration_minutes must be non-negative, got {}",
                    label, assessment.name, assessment.duration_minutes
                ));
            }
            if assessment.cost_estimate < 0.0 || !assessment.cost_estimate.is_finite() {
                report.stats.invalid_costs += 1;
                report.add_error(format!(
                    "Visit '{}', assessment '{}': cost_estimate must be a non-negative number, got {}",
                    label, assessment.name, assessment.cost_estimate
                ));
            }
            if !(1..=MAX_DISCOMFORT_LEVEL).contains(&assessment.patient_discomfort_level) {
                report.stats.invalid_discomfort_levels += 1;
                report.add_error(format!(
                    "Visit '{}', assessment '{}': patient_discomfort_level must be 1 to {}, got {}",
                    label, assessment.name, MAX_DISCOMFORT_LEVEL, assessment.patient_discomfort_level
                ));
            }
        }
    }

    report
}

/// Fail with [`EngineError::ValidationError`] when the schedule has errors.
/// Warnings are logged and otherwise ignored.
pub fn ensure_valid(schedule: &Schedule) -> EngineResult<()> {
    let report = validate_schedule(schedule);

    for warning in &report.warnings {
        log::warn!("{}", warning);
    }

    if report.is_valid {
        return Ok(());
    }

    Err(EngineError::validation(format!(
        "{} error(s): {}",
        report.errors.len(),
        report.errors.join("; ")
    ))
    .with_context(
        ErrorContext::at("validate_schedule").about(&schedule.protocol_name),
    ))
}

/// Accepts "1".."4", optionally prefixed with "Phase" and optionally
/// followed by a sub-phase letter ("2b", "Phase 1a").
fn is_known_phase(phase: &str) -> bool {
    let trimmed = phase.trim();
    let digits = match trimmed.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("phase") => trimmed[5..].trim_start(),
        _ => trimmed,
    };

    let mut chars = digits.chars();
    match chars.next() {
        Some('1'..='4') => {}
        _ => return false,
    }
    match chars.next() {
        None => true,
        Some(c) => c.is_ascii_alphabetic() && chars.next().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assessment, AssessmentCategory, Visit};

    fn valid_schedule() -> Schedule {
        let mut visit = Visit::new(
            "Day 1",
            1,
            vec![Assessment::new("Vitals", AssessmentCategory::VitalSigns, 10)],
        );
        visit.id = Some("v1".to_string());
        Schedule::new("ABC-123", "oncology", "2", 84, vec![visit])
    }

    #[test]
    fn test_valid_schedule_passes() {
        let report = validate_schedule(&valid_schedule());
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(ensure_valid(&valid_schedule()).is_ok());
    }

    #[test]
    fn test_range_errors_are_collected() {
        let mut schedule = valid_schedule();
        {
            let assessment = &mut schedule.visits[0].assessments[0];
            assessment.duration_minutes = -5;
            assessment.patient_discomfort_level = 11;
            assessment.cost_estimate = -1.0;
        }
        schedule.visits[0].window_days_before = -2;

        let report = validate_schedule(&schedule);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 4);
        assert_eq!(report.stats.invalid_durations, 1);
        assert_eq!(report.stats.invalid_discomfort_levels, 1);
        assert_eq!(report.stats.invalid_costs, 1);
        assert_eq!(report.stats.invalid_windows, 1);
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut schedule = valid_schedule();
        let mut dup = Visit::new("Late", 200, vec![]);
        dup.id = Some("v1".to_string());
        schedule.visits.push(dup);

        let report = validate_schedule(&schedule);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.stats.duplicate_visit_ids, 1);
        assert_eq!(report.stats.visits_beyond_duration, 1);
        assert_eq!(report.stats.empty_visits, 1);
    }

    #[test]
    fn test_ensure_valid_returns_validation_error() {
        let mut schedule = valid_schedule();
        schedule.visits[0].assessments[0].patient_discomfort_level = 0;

        let err = ensure_valid(&schedule).unwrap_err();
        assert!(matches!(err, EngineError::ValidationError { .. }));
        assert!(err.message().contains("patient_discomfort_level"));
        assert_eq!(err.context().subject.as_deref(), Some("ABC-123"));
    }

    #[test]
    fn test_phase_formats() {
        for phase in ["1", "4", "2b", "Phase 3", "phase 1a", " 2 "] {
            assert!(is_known_phase(phase), "{} should be accepted", phase);
        }
        for phase in ["", "0", "5", "II", "Phase", "2/3", "12"] {
            assert!(!is_known_phase(phase), "{} should be rejected", phase);
        }
    }

    #[test]
    fn test_extreme_days_and_windows_are_rejected() {
        let mut early = Visit::new(
            "Far Past",
            -2_000_000_000,
            vec![Assessment::new("Vitals", AssessmentCategory::VitalSigns, 10)],
        );
        early.window_days_before = 5;
        early.window_days_after = 5;
        let mut late = early.clone();
        late.name = "Far Future".to_string();
        late.day = 2_000_000_000;
        late.window_days_after = i32::MAX;

        let schedule = Schedule::new("EDGE-1", "oncology", "2", i32::MAX, vec![early, late]);
        let report = validate_schedule(&schedule);

        assert!(!report.is_valid);
        assert_eq!(report.stats.invalid_days, 2);
        assert_eq!(report.stats.invalid_windows, 1);
        assert!(report.errors.iter().any(|e| e.contains("total_duration_days")));
        assert!(ensure_valid(&schedule).is_err());
    }

    #[test]
    fn test_day_bounds_are_inclusive() {
        let mut schedule = valid_schedule();
        schedule.total_duration_days = MAX_ABS_DAY;
        schedule.visits[0].day = -MAX_ABS_DAY;
        schedule.visits[0].window_days_before = MAX_WINDOW_DAYS;
        schedule.visits[0].window_days_after = MAX_WINDOW_DAYS;

        assert!(validate_schedule(&schedule).is_valid);
    }

    #[test]
    fn test_empty_schedule_is_valid() {
        let schedule = Schedule::new("EMPTY", "neurology", "1", 0, vec![]);
        let report = validate_schedule(&schedule);
        assert!(report.is_valid);
        assert_eq!(report.stats.total_visits, 0);
    }
}
