//! Practical feasibility checks.
//!
//! Produces warnings only. Advisory warnings from an external compliance
//! service are appended after the built-in checks.

use crate::advisory::{Advisory, ComplianceAdvisory};
use crate::config::RuleConfig;
use crate::models::{day_gap, AssessmentCategory, Schedule, Severity, Visit, Warning};

/// Run every built-in check and merge resolved compliance warnings.
pub fn check_logistical_feasibility(
    schedule: &Schedule,
    rules: &RuleConfig,
    compliance: &Advisory<ComplianceAdvisory>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for visit in &schedule.visits {
        if is_weekend_day(visit.day) {
            warnings.push(Warning::practical(
                Severity::Medium,
                format!("{} scheduled on weekend (Day {})", visit.name, visit.day),
                vec![visit.name.clone()],
                "Consider moving to weekday or confirm site weekend availability",
            ));
        }
    }

    for visit in &schedule.visits {
        if visit.total_duration_minutes() > rules.max_visit_minutes {
            warnings.push(Warning::practical(
                Severity::High,
                format!(
                    "{} exceeds {} hours duration",
                    visit.name,
                    rules.max_visit_minutes / 60
                ),
                vec![visit.name.clone()],
                "Split into multiple visits or allow procedures over 2 days",
            ));
        }

        if visit.fasting_count() > 1 {
            warnings.push(Warning::practical(
                Severity::Medium,
                format!("Multiple fasting requirements in {}", visit.name),
                vec![visit.name.clone()],
                "Consolidate fasting procedures or split across visits",
            ));
        }
    }

    if let Some(warning) = check_pk_clustering(schedule, rules) {
        warnings.push(warning);
    }

    match compliance {
        Advisory::Resolved(advisory) => {
            warnings.extend(advisory.warnings.iter().map(|w| w.to_warning()));
        }
        Advisory::Unavailable(reason) => {
            log::info!("compliance advisory unavailable, using built-in checks only: {}", reason);
        }
        Advisory::Absent => {}
    }

    warnings
}

/// Weekend heuristic: day 0 and day 6 of each 7-day cycle.
pub fn is_weekend_day(day: i32) -> bool {
    matches!(day.rem_euclid(7), 0 | 6)
}

/// Three PK visits inside the cluster span, once the schedule has enough PK
/// visits to matter. Only the first cluster is reported.
fn check_pk_clustering(schedule: &Schedule, rules: &RuleConfig) -> Option<Warning> {
    let mut pk_visits: Vec<&Visit> = schedule
        .visits
        .iter()
        .filter(|v| {
            v.assessments
                .iter()
                .any(|a| a.category == AssessmentCategory::PkSample)
        })
        .collect();

    if pk_visits.len() < rules.pk_min_visits {
        return None;
    }
    pk_visits.sort_by_key(|v| v.day);

    pk_visits
        .windows(3)
        .find(|triplet| day_gap(triplet[0], triplet[2]) <= i64::from(rules.pk_cluster_span_days))
        .map(|triplet| {
            Warning::practical(
                Severity::High,
                "Intensive PK sampling schedule detected",
                triplet.iter().map(|v| v.name.clone()).collect(),
                "Consider sparse PK sampling or home health visits",
            )
        })
}
