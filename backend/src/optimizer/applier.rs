use serde::{Deserialize, Serialize};

use crate::models::{
    rank_suggestions, AssessmentCategory, Schedule, Suggestion, SuggestionAction, Visit,
    VisitTarget,
};

/// What happened to one suggestion during application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ApplicationOutcome {
    Applied,
    /// The suggestion did not change the schedule, usually because an earlier
    /// step renamed or removed its target.
    Skipped(String),
}

impl ApplicationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplicationOutcome::Applied)
    }
}

/// Apply every suggestion to a copy of `schedule` and return the copy.
///
/// See [`apply_suggestions_with_report`].
pub fn apply_suggestions(schedule: &Schedule, suggestions: &[Suggestion]) -> Schedule {
    apply_suggestions_with_report(schedule, suggestions).0
}

/// Apply every suggestion to a copy of `schedule`.
///
/// Suggestions run in descending order of estimated reduction, ties in the
/// order given. Only `Suggestion::action` is read. A suggestion whose target
/// no longer exists is skipped, never an error.
///
/// The returned outcomes line up with `suggestions` index for index.
pub fn apply_suggestions_with_report(
    schedule: &Schedule,
    suggestions: &[Suggestion],
) -> (Schedule, Vec<ApplicationOutcome>) {
    let mut optimized = schedule.clone();
    let mut outcomes = vec![ApplicationOutcome::Applied; suggestions.len()];

    let mut ranked: Vec<(usize, Suggestion)> = suggestions.iter().cloned().enumerate().collect();
    ranked.sort_by(|(_, a), (_, b)| {
        b.estimated_burden_reduction
            .partial_cmp(&a.estimated_burden_reduction)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (idx, suggestion) in &ranked {
        let outcome = match apply_action(&mut optimized, &suggestion.action) {
            Ok(()) => ApplicationOutcome::Applied,
            Err(reason) => {
                log::debug!("skipped '{}': {}", suggestion.description, reason);
                ApplicationOutcome::Skipped(reason)
            }
        };
        outcomes[*idx] = outcome;
    }

    (optimized, outcomes)
}

/// Rank `suggestions` in place, then apply them. Convenience for callers
/// that also want the ranked list.
pub fn rank_and_apply(
    schedule: &Schedule,
    suggestions: &mut [Suggestion],
) -> (Schedule, Vec<ApplicationOutcome>) {
    rank_suggestions(suggestions);
    apply_suggestions_with_report(schedule, suggestions)
}

fn apply_action(schedule: &mut Schedule, action: &SuggestionAction) -> Result<(), String> {
    match action {
        SuggestionAction::RemoveAssessment {
            target,
            category,
            name,
        } => remove_assessment(schedule, target, *category, name),
        SuggestionAction::StreamlineSafety { target } => streamline_safety(schedule, target),
        SuggestionAction::Consolidate {
            first,
            second,
            min_window_days,
        } => consolidate(schedule, first, second, *min_window_days),
        SuggestionAction::ExpandWindows { targets, days } => {
            expand_windows(schedule, targets, *days)
        }
        SuggestionAction::IncreaseSpacing {
            target,
            min_gap_days,
        } => increase_spacing(schedule, target, *min_gap_days),
        SuggestionAction::ConvertToRemote { target } => convert_to_remote(schedule, target),
    }
}

fn find_index(visits: &[Visit], target: &VisitTarget) -> Option<usize> {
    visits.iter().position(|v| target.matches(v))
}

fn missing(target: &VisitTarget) -> String {
    format!("no visit matches {}", target.label())
}

fn remove_assessment(
    schedule: &mut Schedule,
    target: &VisitTarget,
    category: AssessmentCategory,
    name: &str,
) -> Result<(), String> {
    let mut removed = 0;
    for visit in schedule.visits.iter_mut().filter(|v| target.matches(v)) {
        let before = visit.assessments.len();
        visit
            .assessments
            .retain(|a| !(a.category == category && a.name == name));
        removed += before - visit.assessments.len();
    }

    if removed == 0 {
        return Err(format!("no {} '{}' on {}", category, name, target.label()));
    }
    Ok(())
}

/// Keep the first assessment of each safety category; everything else keeps
/// its position.
fn streamline_safety(schedule: &mut Schedule, target: &VisitTarget) -> Result<(), String> {
    let idx = find_index(&schedule.visits, target).ok_or_else(|| missing(target))?;
    let visit = &mut schedule.visits[idx];

    let before = visit.assessments.len();
    let mut seen: Vec<AssessmentCategory> = Vec::new();
    visit.assessments.retain(|a| {
        if !a.category.is_safety() {
            return true;
        }
        if seen.contains(&a.category) {
            return false;
        }
        seen.push(a.category);
        true
    });

    if visit.assessments.len() == before {
        return Err(format!("{} has no duplicate safety assessments", visit.name));
    }
    Ok(())
}

fn consolidate(
    schedule: &mut Schedule,
    first: &VisitTarget,
    second: &VisitTarget,
    min_window_days: i32,
) -> Result<(), String> {
    let first_idx = find_index(&schedule.visits, first).ok_or_else(|| missing(first))?;
    let second_idx = schedule
        .visits
        .iter()
        .enumerate()
        .position(|(i, v)| i != first_idx && second.matches(v))
        .ok_or_else(|| missing(second))?;

    let absorbed = schedule.visits.remove(second_idx);
    let first_idx = if second_idx < first_idx {
        first_idx - 1
    } else {
        first_idx
    };

    let merged = &mut schedule.visits[first_idx];
    merged.assessments.extend(absorbed.assessments);
    merged.name = format!("{} + {}", merged.name, absorbed.name);
    // The floor of the mean of two i32 values always fits in i32
    merged.day = (i64::from(merged.day) + i64::from(absorbed.day)).div_euclid(2) as i32;
    merged.window_days_before = merged.window_days_before.max(min_window_days);
    merged.window_days_after = merged.window_days_after.max(min_window_days);

    Ok(())
}

fn expand_windows(schedule: &mut Schedule, targets: &[VisitTarget], days: i32) -> Result<(), String> {
    let mut matched = false;
    for visit in schedule
        .visits
        .iter_mut()
        .filter(|v| targets.iter().any(|t| t.matches(v)))
    {
        visit.window_days_before = days;
        visit.window_days_after = days;
        matched = true;
    }

    if !matched {
        let labels: Vec<String> = targets.iter().map(VisitTarget::label).collect();
        return Err(format!("no visit matches {}", labels.join(", ")));
    }
    Ok(())
}

/// The predecessor is the previous visit in list order, not by day.
fn increase_spacing(
    schedule: &mut Schedule,
    target: &VisitTarget,
    min_gap_days: i32,
) -> Result<(), String> {
    let idx = find_index(&schedule.visits, target).ok_or_else(|| missing(target))?;
    if idx == 0 {
        return Err(format!("{} has no predecessor", target.label()));
    }

    let prev_day = schedule.visits[idx - 1].day;
    let visit = &mut schedule.visits[idx];
    if i64::from(visit.day) - i64::from(prev_day) >= i64::from(min_gap_days) {
        return Err(format!("{} is already spaced", visit.name));
    }

    visit.day = prev_day.saturating_add(min_gap_days);
    Ok(())
}

fn convert_to_remote(schedule: &mut Schedule, target: &VisitTarget) -> Result<(), String> {
    let idx = find_index(&schedule.visits, target).ok_or_else(|| missing(target))?;
    let visit = &mut schedule.visits[idx];

    if visit.assessments.iter().all(|a| a.can_be_done_remotely) {
        visit.name.push_str(" (Remote)");
    } else {
        visit.name.push_str(" (Partial Remote)");
        for assessment in visit
            .assessments
            .iter_mut()
            .filter(|a| a.can_be_done_remotely)
        {
            assessment.name.push_str(" (Remote)");
        }
    }
    Ok(())
}
