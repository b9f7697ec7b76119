mod support;

use trial_burden::advisory::Advisory;
use trial_burden::io::schedule_checksum;
use trial_burden::models::{
    Assessment, AssessmentCategory, BurdenCategory, Schedule, Severity, SuggestionKind, Visit,
    WarningCategory,
};
use trial_burden::optimizer::{apply_suggestions, apply_suggestions_with_report, RulesEngine};
use trial_burden::rules::{check_logistical_feasibility, RemoteOpportunityDetector, SuggestionDetector};
use trial_burden::{
    calculate_patient_burden, calculate_site_burden, compare_burden_scores, optimize_schedule,
    EngineConfig,
};

use support::{oncology_schedule, visit_with_window};

#[test]
fn zero_visit_schedule_scores_low() {
    let schedule = Schedule::new("EMPTY", "neurology", "1", 0, vec![]);

    let patient = calculate_patient_burden(&schedule);
    let site = calculate_site_burden(&schedule);
    assert_eq!(patient.total_score, 0.0);
    assert_eq!(patient.category, BurdenCategory::Low);
    assert_eq!(site.total_score, 0.0);
    assert_eq!(site.category, BurdenCategory::Low);

    let (optimized, suggestions, warnings) =
        optimize_schedule(&schedule, &Advisory::Absent, &Advisory::Absent);
    assert!(optimized.visits.is_empty());
    assert!(suggestions.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn comparing_a_score_with_itself_reports_no_reduction() {
    let score = calculate_patient_burden(&oncology_schedule());
    let (improvement, summary) = compare_burden_scores(&score, &score);
    assert_eq!(improvement, 0.0);
    assert_eq!(summary, "No significant burden reduction achieved");
}

#[test]
fn two_visits_three_days_apart_are_merged() {
    let draw = Assessment::new("CBC", AssessmentCategory::BloodDraw, 15);
    let schedule = Schedule::new(
        "MERGE-1",
        "hematology",
        "1",
        30,
        vec![
            visit_with_window("Day 1", 1, 3, vec![draw.clone()]),
            visit_with_window("Day 4", 4, 3, vec![draw]),
        ],
    );

    let (optimized, suggestions, _) =
        optimize_schedule(&schedule, &Advisory::Absent, &Advisory::Absent);

    let consolidations: Vec<_> = suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::Consolidation)
        .collect();
    assert_eq!(consolidations.len(), 1);
    assert_eq!(consolidations[0].visits_affected, vec!["Day 1", "Day 4"]);

    assert_eq!(optimized.visits.len(), 1);
    assert_eq!(optimized.visits[0].assessments.len(), 2);
}

#[test]
fn nine_hour_long_assessments_raise_high_warning() {
    let assessments = (0..9)
        .map(|i| Assessment::new(format!("Scale {}", i), AssessmentCategory::CognitiveTest, 60))
        .collect();
    let schedule = Schedule::new(
        "LONG-1",
        "neurology",
        "2",
        30,
        vec![Visit::new("Assessment Day", 3, assessments)],
    );

    let warnings =
        check_logistical_feasibility(&schedule, &EngineConfig::default().rules, &Advisory::Absent);
    assert!(warnings.iter().any(|w| w.severity == Severity::High
        && w.category == WarningCategory::Practical
        && w.description.contains("exceeds 6 hours")));
}

#[test]
fn fully_remote_visit_is_converted() {
    let mut diary = Assessment::new("Symptom Diary", AssessmentCategory::Questionnaire, 15);
    diary.can_be_done_remotely = true;
    let mut survey = Assessment::new("PROMIS-29", AssessmentCategory::Questionnaire, 20);
    survey.can_be_done_remotely = true;

    let schedule = Schedule::new(
        "REMOTE-1",
        "rheumatology",
        "3",
        90,
        vec![visit_with_window("Month 2", 60, 3, vec![diary, survey])],
    );

    let suggestions = RemoteOpportunityDetector.detect(&schedule, &EngineConfig::default());
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].kind, SuggestionKind::RemoteConversion);
    assert_eq!(suggestions[0].estimated_burden_reduction, 20.0);

    let applied = apply_suggestions(&schedule, &suggestions);
    assert!(applied.visits[0].name.ends_with("(Remote)"));
    assert_eq!(applied.visits[0].name, "Month 2 (Remote)");
}

#[test]
fn empty_suggestion_list_is_identity() {
    let schedule = oncology_schedule();
    assert_eq!(apply_suggestions(&schedule, &[]), schedule);
}

#[test]
fn consolidation_count_matches_visit_reduction() {
    let schedule = oncology_schedule();
    let (_, suggestions, _) = optimize_schedule(&schedule, &Advisory::Absent, &Advisory::Absent);

    let (optimized, outcomes) = apply_suggestions_with_report(&schedule, &suggestions);
    let merged = suggestions
        .iter()
        .zip(&outcomes)
        .filter(|(s, o)| s.kind == SuggestionKind::Consolidation && o.is_applied())
        .count();

    assert_eq!(schedule.visits.len() - optimized.visits.len(), merged);
}

#[test]
fn optimization_is_deterministic() {
    let schedule = oncology_schedule();

    let (first, first_suggestions, _) =
        optimize_schedule(&schedule.clone(), &Advisory::Absent, &Advisory::Absent);
    let (second, second_suggestions, _) =
        optimize_schedule(&schedule.clone(), &Advisory::Absent, &Advisory::Absent);

    assert_eq!(
        schedule_checksum(&first).unwrap(),
        schedule_checksum(&second).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first_suggestions).unwrap(),
        serde_json::to_string(&second_suggestions).unwrap()
    );
}

#[test]
fn oncology_schedule_end_to_end() {
    let schedule = oncology_schedule();
    let result = RulesEngine::default()
        .optimize(&schedule, Advisory::Absent, Advisory::Absent)
        .unwrap();

    assert!(!result.suggestions.is_empty());
    assert!(result.optimized_schedule.visits.len() <= schedule.visits.len());
    let (improvement, summary) =
        compare_burden_scores(&result.original_patient_burden, &result.optimized_patient_burden);
    assert_eq!(result.improvement_percentage, improvement);
    assert_eq!(result.summary, summary);
    assert_eq!(result.original_schedule, schedule);

    // Screening has three safety categories but is not baseline
    assert!(result
        .suggestions
        .iter()
        .any(|s| s.description == "Streamline safety assessments on Screening"));
    // Baseline is exempt from streamlining
    assert!(result
        .suggestions
        .iter()
        .all(|s| s.description != "Streamline safety assessments on Baseline/Day 1"));

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["suggestions"][0]["action"]["op"].is_string());
    assert!(json["change_summary"]["suggestions_effective"].is_u64());
}
