use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::advisory::{Advisory, ComplexityAdvisory, ComplianceAdvisory};
use crate::error::{EngineError, ErrorContext};
use crate::models::Schedule;
use crate::validation::{validate_schedule, ValidationReport};

/// A parsed and validated schedule.
#[derive(Debug, Clone)]
pub struct ScheduleLoadResult {
    pub schedule: Schedule,
    /// SHA-256 of the canonical serialized schedule.
    pub checksum: String,
    /// Validation report; always valid, may carry warnings.
    pub report: ValidationReport,
}

pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Load a schedule from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<ScheduleLoadResult> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule file {}", path.display()))?;
        Self::load_from_json_str(&content)
            .with_context(|| format!("Failed to load schedule from {}", path.display()))
    }

    /// Parse and validate a schedule from JSON text.
    ///
    /// Fails if the JSON does not match the schedule model or if validation
    /// reports errors. Parse failures carry an [`EngineError::ParseError`]
    /// with the line and column of the problem.
    pub fn load_from_json_str(json_str: &str) -> Result<ScheduleLoadResult> {
        let schedule: Schedule = serde_json::from_str(json_str).map_err(|err| {
            let location = format!("line {}, column {}", err.line(), err.column());
            EngineError::from(err)
                .with_context(ErrorContext::at("load_schedule").located(location))
        })?;

        let report = validate_schedule(&schedule);
        if !report.is_valid {
            anyhow::bail!(
                "Schedule '{}' failed validation: {}",
                schedule.protocol_name,
                report.errors.join("; ")
            );
        }
        for warning in &report.warnings {
            log::warn!("{}", warning);
        }

        let checksum = schedule_checksum(&schedule)?;
        log::debug!(
            "loaded schedule {} ({} visits, checksum {})",
            schedule.protocol_name,
            schedule.visits.len(),
            checksum
        );

        Ok(ScheduleLoadResult {
            schedule,
            checksum,
            report,
        })
    }
}

/// Reads advisory payloads produced by external services.
///
/// Advisory data is optional. Unreadable files, broken JSON and payloads of
/// the wrong shape all become [`Advisory::Unavailable`] and never fail a run.
pub struct AdvisoryLoader;

impl AdvisoryLoader {
    pub fn compliance_from_file(path: &Path) -> Advisory<ComplianceAdvisory> {
        match read_json(path) {
            Ok(value) => ComplianceAdvisory::from_json(&value),
            Err(err) => unavailable(err),
        }
    }

    pub fn complexity_from_file(path: &Path) -> Advisory<ComplexityAdvisory> {
        match read_json(path) {
            Ok(value) => ComplexityAdvisory::from_json(&value),
            Err(err) => unavailable(err),
        }
    }
}

fn unavailable<T>(err: anyhow::Error) -> Advisory<T> {
    let reason = format!("{:#}", err);
    log::warn!("advisory data unavailable: {}", reason);
    Advisory::Unavailable(reason)
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read advisory file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse advisory JSON in {}", path.display()))
}

/// SHA-256 checksum of a schedule's canonical JSON form.
///
/// Field order is fixed by the model, so equal schedules always hash equal.
pub fn schedule_checksum(schedule: &Schedule) -> Result<String> {
    let canonical = serde_json::to_string(schedule).context("Failed to serialize schedule")?;
    Ok(calculate_checksum(&canonical))
}

/// SHA-256 of `content`, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
