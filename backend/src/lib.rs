//! # Trial Burden Engine
//!
//! Scores clinical-trial visit schedules for patient and site burden and
//! proposes a lower-burden schedule using deterministic rules.
//!
//! ## Features
//!
//! - **Scoring**: normalized 0-100 patient and site burden, score comparison
//!   and per-visit hotspots
//! - **Rules**: redundancy, consolidation, remote-conversion and timing
//!   suggestions, plus practical feasibility warnings
//! - **Optimization**: ranked, structured suggestions applied to a copy of the
//!   schedule, then rescored
//! - **Loading**: JSON schedules with validation and content checksums
//!
//! ## Architecture
//!
//! - [`models`]: schedule, score and finding types
//! - [`burden`]: the burden calculator
//! - [`rules`]: suggestion detectors and the feasibility checker
//! - [`optimizer`]: the suggestion applier and the rules engine
//! - [`advisory`]: optional data from external analysis services
//! - [`validation`]: structural checks run before optimization
//! - [`config`]: injectable weights, caps and thresholds
//! - [`io`]: JSON loaders
//!
//! ## Example
//!
//! ```
//! use trial_burden::advisory::Advisory;
//! use trial_burden::models::{Assessment, AssessmentCategory, Schedule, Visit};
//! use trial_burden::optimizer::RulesEngine;
//!
//! let draw = Assessment::new("CBC", AssessmentCategory::BloodDraw, 15);
//! let schedule = Schedule::new(
//!     "ABC-123",
//!     "oncology",
//!     "2",
//!     30,
//!     vec![
//!         Visit::new("Day 1", 1, vec![draw.clone()]),
//!         Visit::new("Day 4", 4, vec![draw]),
//!     ],
//! );
//!
//! let result = RulesEngine::default()
//!     .optimize(&schedule, Advisory::Absent, Advisory::Absent)
//!     .unwrap();
//! assert_eq!(result.optimized_schedule.visits.len(), 1);
//! ```

pub mod advisory;
pub mod burden;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod optimizer;
pub mod rules;
pub mod validation;

pub use advisory::{Advisory, ComplexityAdvisory, ComplianceAdvisory};
pub use burden::{
    calculate_patient_burden, calculate_site_burden, compare_burden_scores,
    identify_burden_hotspots, BurdenCalculator,
};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, ErrorContext};
pub use optimizer::{
    apply_suggestions, generate_optimization_summary, optimize_schedule, OptimizationResult,
    OptimizationSummary, RulesEngine,
};
pub use validation::{ensure_valid, validate_schedule, ValidationReport};
