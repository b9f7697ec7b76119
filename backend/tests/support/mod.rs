#![allow(dead_code)]

use std::sync::Mutex;

use trial_burden::models::{Assessment, AssessmentCategory, Schedule, Visit};

/// Variable read by `EngineConfig::from_env_or_default`.
pub const CONFIG_ENV: &str = "BURDEN_CONFIG";

// Tests in one binary share the process environment.
static CONFIG_ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with `BURDEN_CONFIG` pointing at `path` (or unset for `None`),
/// then puts the previous value back, even if `f` panics.
pub fn with_config_env<R>(path: Option<&str>, f: impl FnOnce() -> R) -> R {
    let _lock = CONFIG_ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = ConfigEnvRestore(std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => std::env::set_var(CONFIG_ENV, path),
        None => std::env::remove_var(CONFIG_ENV),
    }
    f()
}

struct ConfigEnvRestore(Option<String>);

impl Drop for ConfigEnvRestore {
    fn drop(&mut self) {
        match self.0.take() {
            Some(previous) => std::env::set_var(CONFIG_ENV, previous),
            None => std::env::remove_var(CONFIG_ENV),
        }
    }
}

// ---------------------------------------------------------------------------
// Assessment templates
// ---------------------------------------------------------------------------

pub fn vital_signs() -> Assessment {
    let mut a = Assessment::new("Vital Signs", AssessmentCategory::VitalSigns, 15);
    a.equipment_needed = vec!["bp_monitor".into(), "thermometer".into()];
    a.staff_required = vec!["nurse".into()];
    a.cost_estimate = 50.0;
    a
}

pub fn safety_labs() -> Assessment {
    let mut a = Assessment::new("Safety Labs", AssessmentCategory::BloodDraw, 15);
    a.is_invasive = true;
    a.is_fasting_required = true;
    a.equipment_needed = vec!["phlebotomy_kit".into()];
    a.staff_required = vec!["nurse".into(), "lab_tech".into()];
    a.cost_estimate = 150.0;
    a.patient_discomfort_level = 3;
    a
}

pub fn pk_draw() -> Assessment {
    let mut a = Assessment::new("PK Sample", AssessmentCategory::PkSample, 10);
    a.is_invasive = true;
    a.staff_required = vec!["nurse".into()];
    a.cost_estimate = 200.0;
    a.patient_discomfort_level = 3;
    a
}

pub fn ecg() -> Assessment {
    let mut a = Assessment::new("12-lead ECG", AssessmentCategory::Ecg, 20);
    a.equipment_needed = vec!["ecg_machine".into()];
    a.staff_required = vec!["ecg_tech".into()];
    a.cost_estimate = 120.0;
    a
}

pub fn ct_scan() -> Assessment {
    let mut a = Assessment::new("CT Scan", AssessmentCategory::Imaging, 60);
    a.equipment_needed = vec!["ct_scanner".into(), "contrast".into(), "injector".into()];
    a.staff_required = vec!["radiologist".into(), "radiology_tech".into()];
    a.cost_estimate = 1500.0;
    a.patient_discomfort_level = 4;
    a
}

pub fn qol_questionnaire() -> Assessment {
    let mut a = Assessment::new("QoL Questionnaire", AssessmentCategory::Questionnaire, 20);
    a.staff_required = vec!["coordinator".into()];
    a.cost_estimate = 25.0;
    a.can_be_done_remotely = true;
    a
}

pub fn urinalysis() -> Assessment {
    let mut a = Assessment::new("Urinalysis", AssessmentCategory::Urinalysis, 10);
    a.staff_required = vec!["lab_tech".into()];
    a.cost_estimate = 40.0;
    a
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

pub fn visit_with_window(name: &str, day: i32, window: i32, assessments: Vec<Assessment>) -> Visit {
    let mut visit = Visit::new(name, day, assessments);
    visit.window_days_before = window;
    visit.window_days_after = window;
    visit
}

/// A phase 2 oncology schedule with plenty of optimization opportunities.
pub fn oncology_schedule() -> Schedule {
    let mut screening = visit_with_window(
        "Screening",
        -7,
        7,
        vec![vital_signs(), safety_labs(), ecg(), ct_scan(), urinalysis()],
    );
    screening.is_screening = true;

    let mut baseline = Visit::new(
        "Baseline/Day 1",
        1,
        vec![
            vital_signs(),
            safety_labs(),
            pk_draw(),
            qol_questionnaire(),
            ecg(),
            urinalysis(),
        ],
    );
    baseline.is_baseline = true;
    baseline.is_treatment = true;

    let mut week2 = visit_with_window("Week 2", 15, 2, vec![vital_signs(), safety_labs(), pk_draw()]);
    week2.is_treatment = true;

    Schedule::new(
        "ONC-2024-001",
        "oncology",
        "2",
        84,
        vec![
            screening,
            baseline,
            visit_with_window("Week 1 Safety", 8, 1, vec![vital_signs(), safety_labs(), ecg()]),
            week2,
            visit_with_window(
                "Week 4",
                29,
                3,
                vec![vital_signs(), safety_labs(), ct_scan(), qol_questionnaire(), urinalysis(), ecg()],
            ),
            visit_with_window("Week 6 Check-in", 43, 3, vec![qol_questionnaire()]),
            visit_with_window("Week 8", 57, 3, vec![vital_signs(), safety_labs(), ct_scan()]),
            visit_with_window("End of Study", 84, 7, vec![vital_signs(), safety_labs(), qol_questionnaire()]),
        ],
    )
}

pub fn schedule_json(schedule: &Schedule) -> String {
    serde_json::to_string_pretty(schedule).expect("schedule serializes")
}
