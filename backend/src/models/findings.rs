// ============================================================================
// Suggestions and warnings
// ============================================================================
//
// Both are created fresh per optimization run and never mutated afterwards.
// The applier only reads `Suggestion::action`; descriptions are display text.

use serde::{Deserialize, Serialize};

use super::schedule::{AssessmentCategory, Visit};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Elimination,
    Consolidation,
    Rescheduling,
    RemoteConversion,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Elimination => "elimination",
            SuggestionKind::Consolidation => "consolidation",
            SuggestionKind::Rescheduling => "rescheduling",
            SuggestionKind::RemoteConversion => "remote_conversion",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

/// Reference to the visit(s) a suggestion acts on.
///
/// Resolved against the schedule at application time; a target whose visit
/// was renamed or removed by an earlier step no longer matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum VisitTarget {
    Named(String),
    OnDay(i32),
}

impl VisitTarget {
    pub fn named(name: impl Into<String>) -> Self {
        VisitTarget::Named(name.into())
    }

    pub fn matches(&self, visit: &Visit) -> bool {
        match self {
            VisitTarget::Named(name) => visit.name == *name,
            VisitTarget::OnDay(day) => visit.day == *day,
        }
    }

    /// Label used in `visits_affected`.
    pub fn label(&self) -> String {
        match self {
            VisitTarget::Named(name) => name.clone(),
            VisitTarget::OnDay(day) => format!("Day {}", day),
        }
    }
}

/// Executable part of a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SuggestionAction {
    /// Drop every assessment with this category and name from matching visits.
    RemoveAssessment {
        target: VisitTarget,
        category: AssessmentCategory,
        name: String,
    },
    /// Keep at most one assessment per safety category.
    StreamlineSafety { target: VisitTarget },
    /// Merge `second` into `first` and remove `second`. The merged visit's
    /// windows are widened to at least `min_window_days`.
    Consolidate {
        first: VisitTarget,
        second: VisitTarget,
        min_window_days: i32,
    },
    /// Set both window fields of every target to `days`.
    ExpandWindows { targets: Vec<VisitTarget>, days: i32 },
    /// Push the target later so it sits at least `min_gap_days` after its
    /// list predecessor.
    IncreaseSpacing {
        target: VisitTarget,
        min_gap_days: i32,
    },
    /// Convert the visit, or its remote-eligible assessments, to remote.
    ConvertToRemote { target: VisitTarget },
}

impl SuggestionAction {
    pub fn kind(&self) -> SuggestionKind {
        match self {
            SuggestionAction::RemoveAssessment { .. } | SuggestionAction::StreamlineSafety { .. } => {
                SuggestionKind::Elimination
            }
            SuggestionAction::Consolidate { .. } => SuggestionKind::Consolidation,
            SuggestionAction::ExpandWindows { .. } | SuggestionAction::IncreaseSpacing { .. } => {
                SuggestionKind::Rescheduling
            }
            SuggestionAction::ConvertToRemote { .. } => SuggestionKind::RemoteConversion,
        }
    }

    pub fn targets(&self) -> Vec<&VisitTarget> {
        match self {
            SuggestionAction::RemoveAssessment { target, .. }
            | SuggestionAction::StreamlineSafety { target }
            | SuggestionAction::IncreaseSpacing { target, .. }
            | SuggestionAction::ConvertToRemote { target } => vec![target],
            SuggestionAction::Consolidate { first, second, .. } => vec![first, second],
            SuggestionAction::ExpandWindows { targets, .. } => targets.iter().collect(),
        }
    }
}

/// A proposed schedule transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub description: String,
    pub impact: String,
    pub visits_affected: Vec<String>,
    /// Heuristic weight used for ranking, not a measured delta.
    pub estimated_burden_reduction: f64,
    pub implementation_difficulty: Difficulty,
    pub action: SuggestionAction,
}

impl Suggestion {
    /// Build a suggestion whose kind and affected-visit labels are derived
    /// from `action`.
    pub fn new(
        action: SuggestionAction,
        description: impl Into<String>,
        impact: impl Into<String>,
        estimated_burden_reduction: f64,
        implementation_difficulty: Difficulty,
    ) -> Self {
        let visits_affected = action.targets().iter().map(|t| t.label()).collect();
        Self {
            kind: action.kind(),
            description: description.into(),
            impact: impact.into(),
            visits_affected,
            estimated_burden_reduction,
            implementation_difficulty,
            action,
        }
    }

    /// Replace the derived affected-visit labels.
    pub fn with_visits_affected(mut self, visits: Vec<String>) -> Self {
        self.visits_affected = visits;
        self
    }
}

/// Sort suggestions by estimated reduction, highest first. Stable, so ties
/// keep emission order.
pub fn rank_suggestions(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        b.estimated_burden_reduction
            .partial_cmp(&a.estimated_burden_reduction)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Case-insensitive parse; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    Regulatory,
    Ethical,
    Practical,
    Safety,
}

impl WarningCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCategory::Regulatory => "regulatory",
            WarningCategory::Ethical => "ethical",
            WarningCategory::Practical => "practical",
            WarningCategory::Safety => "safety",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regulatory" => Some(WarningCategory::Regulatory),
            "ethical" => Some(WarningCategory::Ethical),
            "practical" => Some(WarningCategory::Practical),
            "safety" => Some(WarningCategory::Safety),
            _ => None,
        }
    }
}

/// Advisory, non-blocking flag about a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub category: WarningCategory,
    pub description: String,
    pub affected_visits: Vec<String>,
    pub recommendation: String,
}

impl Warning {
    pub fn practical(
        severity: Severity,
        description: impl Into<String>,
        affected_visits: Vec<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: WarningCategory::Practical,
            description: description.into(),
            affected_visits,
            recommendation: recommendation.into(),
        }
    }
}
