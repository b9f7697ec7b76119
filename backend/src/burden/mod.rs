//! Patient and site burden scoring.
//!
//! - [`calculator`]: normalized, weighted burden scores, score comparison and
//!   per-visit hotspot ranking
//!
//! The free functions below score with the stock [`EngineConfig`]; build a
//! [`BurdenCalculator`] from a custom configuration to use other weights.
//!
//! [`EngineConfig`]: crate::config::EngineConfig

pub mod calculator;


pub use calculator::{compare_burden_scores, BurdenCalculator, NO_REDUCTION_SUMMARY};

use crate::models::{BurdenHotspot, BurdenScore, Schedule, SiteBurdenScore};

pub fn calculate_patient_burden(schedule: &Schedule) -> BurdenScore {
    BurdenCalculator::default().calculate_patient_burden(schedule)
}

pub fn calculate_site_burden(schedule: &Schedule) -> SiteBurdenScore {
    BurdenCalculator::default().calculate_site_burden(schedule)
}

pub fn identify_burden_hotspots(schedule: &Schedule) -> Vec<BurdenHotspot> {
    BurdenCalculator::default().identify_burden_hotspots(schedule)
}
