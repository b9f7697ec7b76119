// ============================================================================
// Schedule model
// ============================================================================
//
// Assessments, visits and schedules as received from the caller. Derived
// per-visit values (duration, cost, invasive count) are always recomputed
// from the assessments and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of procedure performed during a visit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentCategory {
    VitalSigns,
    BloodDraw,
    Imaging,
    Questionnaire,
    PhysicalExam,
    Ecg,
    Biopsy,
    Urinalysis,
    PkSample,
    CognitiveTest,
}

impl AssessmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentCategory::VitalSigns => "vital_signs",
            AssessmentCategory::BloodDraw => "blood_draw",
            AssessmentCategory::Imaging => "imaging",
            AssessmentCategory::Questionnaire => "questionnaire",
            AssessmentCategory::PhysicalExam => "physical_exam",
            AssessmentCategory::Ecg => "ecg",
            AssessmentCategory::Biopsy => "biopsy",
            AssessmentCategory::Urinalysis => "urinalysis",
            AssessmentCategory::PkSample => "pk_sample",
            AssessmentCategory::CognitiveTest => "cognitive_test",
        }
    }

    /// Safety-monitoring categories (labs and ECG).
    pub fn is_safety(&self) -> bool {
        matches!(
            self,
            AssessmentCategory::BloodDraw | AssessmentCategory::Urinalysis | AssessmentCategory::Ecg
        )
    }
}

impl std::fmt::Display for AssessmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single procedure or test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub category: AssessmentCategory,
    pub duration_minutes: i32,
    #[serde(default)]
    pub is_invasive: bool,
    #[serde(default)]
    pub is_fasting_required: bool,
    #[serde(default)]
    pub equipment_needed: Vec<String>,
    #[serde(default)]
    pub staff_required: Vec<String>,
    #[serde(default)]
    pub cost_estimate: f64,
    #[serde(default = "default_discomfort")]
    pub patient_discomfort_level: i32,
    #[serde(default)]
    pub can_be_done_remotely: bool,
}

fn default_discomfort() -> i32 {
    1
}

impl Assessment {
    /// Minimal assessment of the given category; remaining fields take their
    /// neutral defaults.
    pub fn new(name: impl Into<String>, category: AssessmentCategory, duration_minutes: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            category,
            duration_minutes,
            is_invasive: false,
            is_fasting_required: false,
            equipment_needed: Vec::new(),
            staff_required: Vec::new(),
            cost_estimate: 0.0,
            patient_discomfort_level: default_discomfort(),
            can_be_done_remotely: false,
        }
    }
}

/// A scheduled patient encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Day offset relative to first dose; negative for pre-treatment visits.
    pub day: i32,
    #[serde(default)]
    pub window_days_before: i32,
    #[serde(default)]
    pub window_days_after: i32,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub is_screening: bool,
    #[serde(default)]
    pub is_baseline: bool,
    #[serde(default)]
    pub is_treatment: bool,
    #[serde(default)]
    pub is_follow_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Visit {
    pub fn new(name: impl Into<String>, day: i32, assessments: Vec<Assessment>) -> Self {
        Self {
            id: None,
            name: name.into(),
            day,
            window_days_before: 0,
            window_days_after: 0,
            assessments,
            is_screening: false,
            is_baseline: false,
            is_treatment: false,
            is_follow_up: false,
            notes: None,
        }
    }

    pub fn total_duration_minutes(&self) -> i64 {
        self.assessments
            .iter()
            .map(|a| a.duration_minutes as i64)
            .sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.assessments.iter().map(|a| a.cost_estimate).sum()
    }

    pub fn invasive_procedure_count(&self) -> usize {
        self.assessments.iter().filter(|a| a.is_invasive).count()
    }

    pub fn fasting_count(&self) -> usize {
        self.assessments
            .iter()
            .filter(|a| a.is_fasting_required)
            .count()
    }

    pub fn requires_fasting(&self) -> bool {
        self.assessments.iter().any(|a| a.is_fasting_required)
    }

    pub fn total_window_days(&self) -> i64 {
        i64::from(self.window_days_before) + i64::from(self.window_days_after)
    }
}

/// Days from `earlier` to `later`, widened so extreme offsets cannot overflow.
pub fn day_gap(earlier: &Visit, later: &Visit) -> i64 {
    i64::from(later.day) - i64::from(earlier.day)
}

/// A complete visit schedule for one protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub id: Option<String>,
    pub protocol_name: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
    pub therapeutic_area: String,
    pub phase: String,
    #[serde(default)]
    pub visits: Vec<Visit>,
    pub total_duration_days: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_protocol_version() -> String {
    "1.0".to_string()
}

impl Schedule {
    pub fn new(
        protocol_name: impl Into<String>,
        therapeutic_area: impl Into<String>,
        phase: impl Into<String>,
        total_duration_days: i32,
        visits: Vec<Visit>,
    ) -> Self {
        Self {
            id: None,
            protocol_name: protocol_name.into(),
            protocol_version: default_protocol_version(),
            therapeutic_area: therapeutic_area.into(),
            phase: phase.into(),
            visits,
            total_duration_days,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn total_visits(&self) -> usize {
        self.visits.len()
    }

    pub fn total_assessments(&self) -> usize {
        self.visits.iter().map(|v| v.assessments.len()).sum()
    }

    /// Visits ordered by day. Equal days keep their original relative order.
    pub fn visits_by_day(&self) -> Vec<&Visit> {
        let mut visits: Vec<&Visit> = self.visits.iter().collect();
        visits.sort_by_key(|v| v.day);
        visits
    }
}
