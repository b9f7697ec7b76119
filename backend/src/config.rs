//! Engine configuration file support.
//!
//! Every weight, cap and detector threshold used by the burden calculator and
//! the rule detectors lives here. `EngineConfig::default()` carries the stock
//! values; a TOML file may override any subset of them:
//!
//! ```toml
//! [patient.weights]
//! time = 0.30
//! travel = 0.15
//!
//! [rules]
//! consolidation_max_gap_days = 10
//! ```
//!
//! Category thresholds (25/50/75) are not part of the configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult, ErrorContext};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub patient: PatientBurdenConfig,
    pub site: SiteBurdenConfig,
    pub hotspots: HotspotConfig,
    pub rules: RuleConfig,
}

/// Weights for the patient burden components. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientWeights {
    pub time: f64,
    pub travel: f64,
    pub invasiveness: f64,
    pub fasting: f64,
    pub discomfort: f64,
}

impl Default for PatientWeights {
    fn default() -> Self {
        Self {
            time: 0.25,
            travel: 0.20,
            invasiveness: 0.25,
            fasting: 0.15,
            discomfort: 0.15,
        }
    }
}

impl PatientWeights {
    fn as_pairs(&self) -> [(&'static str, f64); 5] {
        [
            ("time", self.time),
            ("travel", self.travel),
            ("invasiveness", self.invasiveness),
            ("fasting", self.fasting),
            ("discomfort", self.discomfort),
        ]
    }
}

/// Raw values at which each patient component saturates at 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientCaps {
    pub time_hours: f64,
    pub travel_count: f64,
    pub invasive_count: f64,
    pub fasting_count: f64,
}

impl Default for PatientCaps {
    fn default() -> Self {
        Self {
            time_hours: 30.0,
            travel_count: 15.0,
            invasive_count: 10.0,
            fasting_count: 7.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientBurdenConfig {
    pub weights: PatientWeights,
    pub caps: PatientCaps,
    /// Round-trip travel allowance added per visit.
    pub travel_hours_per_visit: f64,
}

impl Default for PatientBurdenConfig {
    fn default() -> Self {
        Self {
            weights: PatientWeights::default(),
            caps: PatientCaps::default(),
            travel_hours_per_visit: 2.0,
        }
    }
}

/// Weights for the site burden components. Must sum to 1.0.
///
/// `staff_roles` defaults to 0.0 so the stock score ignores role diversity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteWeights {
    pub staff_time: f64,
    pub equipment: f64,
    pub complexity: f64,
    pub cost: f64,
    pub staff_roles: f64,
}

impl Default for SiteWeights {
    fn default() -> Self {
        Self {
            staff_time: 0.30,
            equipment: 0.25,
            complexity: 0.25,
            cost: 0.20,
            staff_roles: 0.0,
        }
    }
}

impl SiteWeights {
    fn as_pairs(&self) -> [(&'static str, f64); 5] {
        [
            ("staff_time", self.staff_time),
            ("equipment", self.equipment),
            ("complexity", self.complexity),
            ("cost", self.cost),
            ("staff_roles", self.staff_roles),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteCaps {
    pub staff_hours: f64,
    pub equipment_count: f64,
    pub staff_roles_count: f64,
    pub cost: f64,
    pub complex_count: f64,
}

impl Default for SiteCaps {
    fn default() -> Self {
        Self {
            staff_hours: 200.0,
            equipment_count: 20.0,
            staff_roles_count: 10.0,
            cost: 50_000.0,
            complex_count: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteBurdenConfig {
    pub weights: SiteWeights,
    pub caps: SiteCaps,
    /// Preparation and cleanup minutes added to every assessment.
    pub prep_minutes: f64,
    /// An assessment needing more equipment items than this is complex.
    pub complex_equipment_threshold: usize,
}

impl Default for SiteBurdenConfig {
    fn default() -> Self {
        Self {
            weights: SiteWeights::default(),
            caps: SiteCaps::default(),
            prep_minutes: 15.0,
            complex_equipment_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotspotConfig {
    pub long_visit_hours: f64,
    pub long_visit_points: f64,
    pub invasive_count: usize,
    pub invasive_points: f64,
    pub fasting_points: f64,
    pub discomfort_level: i32,
    pub discomfort_points: f64,
    /// Visits must score strictly above this to be reported.
    pub threshold: f64,
    pub max_results: usize,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            long_visit_hours: 4.0,
            long_visit_points: 30.0,
            invasive_count: 2,
            invasive_points: 25.0,
            fasting_points: 15.0,
            discomfort_level: 5,
            discomfort_points: 20.0,
            threshold: 40.0,
            max_results: 5,
        }
    }
}

/// Detector thresholds and the heuristic reduction weight of each
/// suggestion type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    // Redundancy
    pub redundancy_min_occurrences: usize,
    pub redundancy_window_days: i32,
    pub redundancy_reduction: f64,
    pub safety_max_per_visit: usize,
    pub streamline_reduction: f64,

    // Consolidation
    pub consolidation_max_gap_days: i32,
    pub consolidation_max_minutes: i64,
    pub consolidation_reduction: f64,
    pub window_expansion_min_gap_days: i32,
    pub narrow_window_days: i32,
    pub window_expansion_reduction: f64,
    pub consolidated_min_window_days: i32,

    // Feasibility
    pub max_visit_minutes: i64,
    pub pk_min_visits: usize,
    pub pk_cluster_span_days: i32,

    // Remote
    pub full_remote_reduction: f64,
    pub partial_remote_reduction: f64,

    // Timing
    pub min_total_window_days: i32,
    pub expanded_window_days: i32,
    pub window_reduction: f64,
    pub intensive_invasive_above: usize,
    pub intensive_minutes_above: i64,
    pub intensive_min_spacing_days: i32,
    pub spacing_reduction: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            redundancy_min_occurrences: 3,
            redundancy_window_days: 21,
            redundancy_reduction: 15.0,
            safety_max_per_visit: 2,
            streamline_reduction: 8.0,

            consolidation_max_gap_days: 14,
            consolidation_max_minutes: 480,
            consolidation_reduction: 15.0,
            window_expansion_min_gap_days: 7,
            narrow_window_days: 3,
            window_expansion_reduction: 10.0,
            consolidated_min_window_days: 3,

            max_visit_minutes: 360,
            pk_min_visits: 6,
            pk_cluster_span_days: 3,

            full_remote_reduction: 20.0,
            partial_remote_reduction: 10.0,

            min_total_window_days: 6,
            expanded_window_days: 5,
            window_reduction: 5.0,
            intensive_invasive_above: 1,
            intensive_minutes_above: 180,
            intensive_min_spacing_days: 14,
            spacing_reduction: 12.0,
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::configuration(format!("Failed to read config file: {}", e)).with_context(
                ErrorContext::at("load_config").about(path.display()),
            )
        })?;

        Self::from_toml_str(&content).map_err(|e| {
            let message = e.message().to_string();
            EngineError::configuration(message).with_context(
                ErrorContext::at("load_config").about(path.display()),
            )
        })
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the path named by `BURDEN_CONFIG`, or from
    /// `burden.toml` in the working directory, falling back to defaults when
    /// neither exists.
    pub fn from_env_or_default() -> EngineResult<Self> {
        if let Ok(path) = std::env::var("BURDEN_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let local = PathBuf::from("burden.toml");
        if local.exists() {
            return Self::from_file(local);
        }

        Ok(Self::default())
    }

    /// Check weight sums and that caps are positive.
    pub fn validate(&self) -> EngineResult<()> {
        check_weights("patient.weights", &self.patient.weights.as_pairs())?;
        check_weights("site.weights", &self.site.weights.as_pairs())?;

        let caps = [
            ("patient.caps.time_hours", self.patient.caps.time_hours),
            ("patient.caps.travel_count", self.patient.caps.travel_count),
            ("patient.caps.invasive_count", self.patient.caps.invasive_count),
            ("patient.caps.fasting_count", self.patient.caps.fasting_count),
            ("site.caps.staff_hours", self.site.caps.staff_hours),
            ("site.caps.equipment_count", self.site.caps.equipment_count),
            ("site.caps.staff_roles_count", self.site.caps.staff_roles_count),
            ("site.caps.cost", self.site.caps.cost),
            ("site.caps.complex_count", self.site.caps.complex_count),
        ];
        for (name, value) in caps {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::configuration(format!(
                    "{} must be positive, got {}",
                    name, value
                ))
                .with_context(ErrorContext::at("validate_config").about(name)));
            }
        }

        let allowances = [self.patient.travel_hours_per_visit, self.site.prep_minutes];
        if allowances.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(EngineError::configuration(
                "travel_hours_per_visit and prep_minutes must be finite and non-negative",
            )
            .with_context(ErrorContext::at("validate_config")));
        }

        Ok(())
    }
}

fn check_weights(group: &str, weights: &[(&'static str, f64)]) -> EngineResult<()> {
    if let Some((name, value)) = weights.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
        return Err(EngineError::configuration(format!(
            "weight {} must be a finite non-negative number, got {}",
            name, value
        ))
        .with_context(ErrorContext::at("validate_config").about(group)));
    }

    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(EngineError::configuration(format!(
            "weights must sum to 1.0, got {:.6}",
            sum
        ))
        .with_context(ErrorContext::at("validate_config").about(group)));
    }

    Ok(())
}
