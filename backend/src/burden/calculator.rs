use std::collections::HashSet;

use crate::config::{EngineConfig, HotspotConfig, PatientBurdenConfig, SiteBurdenConfig};
use crate::models::{BurdenCategory, BurdenHotspot, BurdenScore, Schedule, SiteBurdenScore};

/// Summary text used when no component of the patient score improved.
pub const NO_REDUCTION_SUMMARY: &str = "No significant burden reduction achieved";

/// Scores schedules for patient and site burden.
///
/// Pure: never mutates the schedule, and the same schedule always yields the
/// same scores.
#[derive(Debug, Clone, Default)]
pub struct BurdenCalculator {
    patient: PatientBurdenConfig,
    site: SiteBurdenConfig,
    hotspots: HotspotConfig,
}

impl BurdenCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            patient: config.patient.clone(),
            site: config.site.clone(),
            hotspots: config.hotspots.clone(),
        }
    }

    /// Compute the patient burden score.
    ///
    /// Each visit contributes its assessment time plus a fixed round-trip
    /// travel allowance. An empty schedule scores zero.
    pub fn calculate_patient_burden(&self, schedule: &Schedule) -> BurdenScore {
        if schedule.visits.is_empty() {
            return BurdenScore::zero();
        }

        let mut total_time_hours = 0.0;
        let mut travel_count = 0usize;
        let mut invasive_count = 0usize;
        let mut fasting_count = 0usize;
        let mut discomfort_sum = 0i64;
        let mut assessment_count = 0usize;

        for visit in &schedule.visits {
            total_time_hours += visit.total_duration_minutes() as f64 / 60.0;
            total_time_hours += self.patient.travel_hours_per_visit;
            travel_count += 1;

            for assessment in &visit.assessments {
                if assessment.is_invasive {
                    invasive_count += 1;
                }
                if assessment.is_fasting_required {
                    fasting_count += 1;
                }
                discomfort_sum += assessment.patient_discomfort_level as i64;
                assessment_count += 1;
            }
        }

        let avg_discomfort = if assessment_count > 0 {
            discomfort_sum as f64 / assessment_count as f64
        } else {
            0.0
        };

        let caps = &self.patient.caps;
        let weights = &self.patient.weights;

        let time_score = capped_score(total_time_hours, caps.time_hours);
        let travel_score = capped_score(travel_count as f64, caps.travel_count);
        let invasive_score = capped_score(invasive_count as f64, caps.invasive_count);
        let fasting_score = capped_score(fasting_count as f64, caps.fasting_count);
        let discomfort_score = avg_discomfort / 10.0 * 100.0;

        let total_score = time_score * weights.time
            + travel_score * weights.travel
            + invasive_score * weights.invasiveness
            + fasting_score * weights.fasting
            + discomfort_score * weights.discomfort;

        BurdenScore {
            patient_time_hours: round2(total_time_hours),
            patient_travel_count: travel_count,
            invasive_procedures_count: invasive_count,
            fasting_requirements_count: fasting_count,
            average_discomfort_level: round2(avg_discomfort),
            total_score: round2(total_score),
            category: BurdenCategory::from_score(total_score),
        }
    }

    /// Compute the site burden score.
    ///
    /// Staff time per assessment is its duration plus prep/cleanup, multiplied
    /// by the number of staff roles it needs.
    pub fn calculate_site_burden(&self, schedule: &Schedule) -> SiteBurdenScore {
        let mut total_staff_hours = 0.0;
        let mut equipment: HashSet<&str> = HashSet::new();
        let mut staff_roles: HashSet<&str> = HashSet::new();
        let mut total_cost = 0.0;
        let mut complex_count = 0usize;

        for visit in &schedule.visits {
            let mut visit_staff_hours = 0.0;

            for assessment in &visit.assessments {
                let staff_time =
                    (assessment.duration_minutes as f64 + self.site.prep_minutes) / 60.0;
                visit_staff_hours += staff_time * assessment.staff_required.len() as f64;

                equipment.extend(assessment.equipment_needed.iter().map(String::as_str));
                staff_roles.extend(assessment.staff_required.iter().map(String::as_str));

                total_cost += assessment.cost_estimate;

                if assessment.is_invasive
                    || assessment.equipment_needed.len() > self.site.complex_equipment_threshold
                {
                    complex_count += 1;
                }
            }

            total_staff_hours += visit_staff_hours;
        }

        let caps = &self.site.caps;
        let weights = &self.site.weights;

        let staff_score = capped_score(total_staff_hours, caps.staff_hours);
        let equipment_score = capped_score(equipment.len() as f64, caps.equipment_count);
        let roles_score = capped_score(staff_roles.len() as f64, caps.staff_roles_count);
        let cost_score = capped_score(total_cost, caps.cost);
        let complexity_score = capped_score(complex_count as f64, caps.complex_count);

        let total_score = staff_score * weights.staff_time
            + equipment_score * weights.equipment
            + complexity_score * weights.complexity
            + cost_score * weights.cost
            + roles_score * weights.staff_roles;

        SiteBurdenScore {
            total_staff_hours: round2(total_staff_hours),
            unique_equipment_count: equipment.len(),
            unique_staff_roles_count: staff_roles.len(),
            total_cost: round2(total_cost),
            complex_procedures_count: complex_count,
            total_score: round2(total_score),
            category: BurdenCategory::from_score(total_score),
        }
    }

    /// Visits whose heuristic score exceeds the hotspot threshold, highest
    /// first, truncated to the configured maximum. Ties keep visit order.
    pub fn identify_burden_hotspots(&self, schedule: &Schedule) -> Vec<BurdenHotspot> {
        let cfg = &self.hotspots;
        let mut hotspots = Vec::new();

        for visit in &schedule.visits {
            let mut score = 0.0;
            let mut factors = Vec::new();

            let visit_hours = visit.total_duration_minutes() as f64 / 60.0;
            if visit_hours > cfg.long_visit_hours {
                score += cfg.long_visit_points;
                factors.push(format!("Long duration ({:.1} hours)", visit_hours));
            }

            let invasive = visit.invasive_procedure_count();
            if invasive > cfg.invasive_count {
                score += cfg.invasive_points;
                factors.push(format!("{} invasive procedures", invasive));
            }

            if visit.requires_fasting() {
                score += cfg.fasting_points;
                factors.push("Requires fasting".to_string());
            }

            if visit
                .assessments
                .iter()
                .any(|a| a.patient_discomfort_level > cfg.discomfort_level)
            {
                score += cfg.discomfort_points;
                factors.push("High discomfort procedures".to_string());
            }

            if score > cfg.threshold {
                hotspots.push(BurdenHotspot {
                    visit_name: visit.name.clone(),
                    score,
                    factors,
                });
            }
        }

        hotspots.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hotspots.truncate(cfg.max_results);
        hotspots
    }
}

/// Compare two patient scores.
///
/// Returns the relative improvement in percent (negative when the optimized
/// score is worse, 0 when the original score is 0) and a display-only
/// summary of the components that improved.
pub fn compare_burden_scores(original: &BurdenScore, optimized: &BurdenScore) -> (f64, String) {
    let improvement = if original.total_score > 0.0 {
        (original.total_score - optimized.total_score) / original.total_score * 100.0
    } else {
        0.0
    };

    let mut parts = Vec::new();

    let time_saved = original.patient_time_hours - optimized.patient_time_hours;
    if time_saved > 0.0 {
        parts.push(format!("{:.1} hours saved", time_saved));
    }

    if original.patient_travel_count > optimized.patient_travel_count {
        parts.push(format!(
            "{} fewer visits",
            original.patient_travel_count - optimized.patient_travel_count
        ));
    }

    if original.invasive_procedures_count > optimized.invasive_procedures_count {
        parts.push(format!(
            "{} fewer invasive procedures",
            original.invasive_procedures_count - optimized.invasive_procedures_count
        ));
    }

    if improvement > 0.0 {
        parts.push(format!("{:.1}% overall burden reduction", improvement));
    }

    let summary = if parts.is_empty() {
        NO_REDUCTION_SUMMARY.to_string()
    } else {
        parts.join(". ")
    };

    (improvement, summary)
}

/// `raw / cap * 100`, saturating at 100.
fn capped_score(raw: f64, cap: f64) -> f64 {
    if cap <= 0.0 {
        return 0.0;
    }
    (raw / cap * 100.0).min(100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
