//! External advisory inputs.
//!
//! Complexity and compliance analyses are produced by services outside the
//! engine. The caller resolves them (timeouts, retries, fallbacks) and hands
//! the outcome over as an [`Advisory`]. Nothing here performs I/O, and a
//! missing or malformed payload never fails an optimization run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Severity, Warning, WarningCategory};

/// Outcome of an optional external lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Advisory<T> {
    /// The caller did not request the data.
    Absent,
    /// The data was fetched and parsed.
    Resolved(T),
    /// The data was requested but is unusable; the reason is kept for logs.
    Unavailable(String),
}

impl<T> Default for Advisory<T> {
    fn default() -> Self {
        Advisory::Absent
    }
}

impl<T> Advisory<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Advisory::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Advisory::Resolved(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Advisory::Resolved(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Advisory<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Advisory::Absent, Advisory::Resolved)
    }
}

/// A warning reported by an external compliance service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryWarning {
    pub severity: Severity,
    pub category: WarningCategory,
    pub description: String,
    pub affected_visits: Vec<String>,
    pub recommendation: String,
}

impl AdvisoryWarning {
    /// Lenient parse of one warning object. Missing severity defaults to
    /// Medium, missing category to regulatory; `affected_visits` may be a
    /// string or a list of strings.
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let severity = obj
            .get("severity")
            .and_then(Value::as_str)
            .and_then(Severity::parse)
            .unwrap_or(Severity::Medium);
        let category = obj
            .get("type")
            .or_else(|| obj.get("category"))
            .and_then(Value::as_str)
            .and_then(WarningCategory::parse)
            .unwrap_or(WarningCategory::Regulatory);

        let affected_visits = match obj.get("affected_visits") {
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Some(Self {
            severity,
            category,
            description: text("description"),
            affected_visits,
            recommendation: text("recommendation"),
        })
    }

    pub fn to_warning(&self) -> Warning {
        Warning {
            severity: self.severity,
            category: self.category,
            description: self.description.clone(),
            affected_visits: self.affected_visits.clone(),
            recommendation: self.recommendation.clone(),
        }
    }
}

/// Compliance findings from an external knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAdvisory {
    pub warnings: Vec<AdvisoryWarning>,
}

impl ComplianceAdvisory {
    /// Interpret a raw payload. A payload without a `warnings` list, or with
    /// no usable entries in it, is `Unavailable`.
    pub fn from_json(value: &Value) -> Advisory<Self> {
        let Some(items) = value.get("warnings").and_then(Value::as_array) else {
            log::warn!("compliance advisory has no 'warnings' list; ignoring");
            return Advisory::Unavailable("missing 'warnings' list".to_string());
        };

        let warnings: Vec<AdvisoryWarning> =
            items.iter().filter_map(AdvisoryWarning::from_value).collect();
        let skipped = items.len() - warnings.len();
        if skipped > 0 {
            log::warn!("skipped {} malformed compliance warning(s)", skipped);
        }

        if warnings.is_empty() && !items.is_empty() {
            return Advisory::Unavailable("no well-formed warnings".to_string());
        }

        Advisory::Resolved(Self { warnings })
    }
}

/// Protocol complexity assessment from an external analyzer.
///
/// Informational only: it is echoed in the optimization result and does not
/// change detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAdvisory {
    pub complexity_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_level: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ComplexityAdvisory {
    pub fn from_json(value: &Value) -> Advisory<Self> {
        let Some(score) = value.get("complexity_score").and_then(Value::as_f64) else {
            log::warn!("complexity advisory has no numeric 'complexity_score'; ignoring");
            return Advisory::Unavailable("missing numeric 'complexity_score'".to_string());
        };

        let complexity_level = value
            .get("complexity_level")
            .and_then(Value::as_str)
            .map(str::to_string);
        let recommendations = value
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Advisory::Resolved(Self {
            complexity_score: score,
            complexity_level,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compliance_passthrough_with_defaults() {
        let payload = json!({
            "warnings": [
                {
                    "severity": "High",
                    "type": "safety",
                    "description": "No safety labs after dose escalation",
                    "affected_visits": ["Cycle 2 Day 1", "Cycle 3 Day 1"],
                    "recommendation": "Add CBC"
                },
                {
                    "description": "Consent not re-obtained",
                    "affected_visits": "Week 12"
                }
            ]
        });

        let advisory = ComplianceAdvisory::from_json(&payload);
        let compliance = advisory.resolved().expect("resolved");
        assert_eq!(compliance.warnings.len(), 2);

        let first = &compliance.warnings[0];
        assert_eq!(first.severity, Severity::High);
        assert_eq!(first.category, WarningCategory::Safety);
        assert_eq!(first.affected_visits.len(), 2);

        let second = &compliance.warnings[1];
        assert_eq!(second.severity, Severity::Medium);
        assert_eq!(second.category, WarningCategory::Regulatory);
        assert_eq!(second.affected_visits, vec!["Week 12".to_string()]);
        assert_eq!(second.recommendation, "");
    }

    #[test]
    fn test_compliance_without_warnings_is_unavailable() {
        let advisory = ComplianceAdvisory::from_json(&json!({"findings": []}));
        assert!(matches!(advisory, Advisory::Unavailable(_)));
        assert!(advisory.resolved().is_none());
    }

    #[test]
    fn test_compliance_all_malformed_is_unavailable() {
        let advisory = ComplianceAdvisory::from_json(&json!({"warnings": [1, "x", null]}));
        assert!(matches!(advisory, Advisory::Unavailable(_)));
    }

    #[test]
    fn test_empty_warning_list_is_resolved() {
        let advisory = ComplianceAdvisory::from_json(&json!({"warnings": []}));
        assert_eq!(advisory.into_option().map(|c| c.warnings.len()), Some(0));
    }

    #[test]
    fn test_complexity_parsing() {
        let advisory = ComplexityAdvisory::from_json(&json!({
            "complexity_score": 62.5,
            "complexity_level": "High",
            "recommendations": ["Reduce imaging", 3]
        }));
        let complexity = advisory.resolved().expect("resolved");
        assert_eq!(complexity.complexity_score, 62.5);
        assert_eq!(complexity.complexity_level.as_deref(), Some("High"));
        assert_eq!(complexity.recommendations, vec!["Reduce imaging".to_string()]);

        let bad = ComplexityAdvisory::from_json(&json!({"complexity_score": "high"}));
        assert!(matches!(bad, Advisory::Unavailable(_)));
    }

    #[test]
    fn test_from_option() {
        let absent: Advisory<ComplianceAdvisory> = None.into();
        assert_eq!(absent, Advisory::Absent);
        let present: Advisory<u8> = Some(3).into();
        assert!(present.is_resolved());
    }
}
