use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the `Low` band.
pub const LOW_BURDEN_LIMIT: f64 = 25.0;
/// Upper bound (exclusive) of the `Moderate` band.
pub const MODERATE_BURDEN_LIMIT: f64 = 50.0;
/// Upper bound (exclusive) of the `High` band.
pub const HIGH_BURDEN_LIMIT: f64 = 75.0;

/// Burden level derived from a normalized total score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BurdenCategory {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl BurdenCategory {
    /// Categorize a total score using the fixed 25/50/75 thresholds.
    pub fn from_score(score: f64) -> Self {
        if score < LOW_BURDEN_LIMIT {
            BurdenCategory::Low
        } else if score < MODERATE_BURDEN_LIMIT {
            BurdenCategory::Moderate
        } else if score < HIGH_BURDEN_LIMIT {
            BurdenCategory::High
        } else {
            BurdenCategory::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BurdenCategory::Low => "Low",
            BurdenCategory::Moderate => "Moderate",
            BurdenCategory::High => "High",
            BurdenCategory::VeryHigh => "Very High",
        }
    }
}

impl std::fmt::Display for BurdenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient-side burden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurdenScore {
    pub patient_time_hours: f64,
    pub patient_travel_count: usize,
    pub invasive_procedures_count: usize,
    pub fasting_requirements_count: usize,
    pub average_discomfort_level: f64,
    pub total_score: f64,
    pub category: BurdenCategory,
}

impl BurdenScore {
    pub fn zero() -> Self {
        Self {
            patient_time_hours: 0.0,
            patient_travel_count: 0,
            invasive_procedures_count: 0,
            fasting_requirements_count: 0,
            average_discomfort_level: 0.0,
            total_score: 0.0,
            category: BurdenCategory::Low,
        }
    }
}

/// Site-side (staff, equipment, cost) burden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteBurdenScore {
    pub total_staff_hours: f64,
    pub unique_equipment_count: usize,
    pub unique_staff_roles_count: usize,
    pub total_cost: f64,
    pub complex_procedures_count: usize,
    pub total_score: f64,
    pub category: BurdenCategory,
}

/// A visit whose heuristic burden exceeds the hotspot threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurdenHotspot {
    pub visit_name: String,
    pub score: f64,
    pub factors: Vec<String>,
}
