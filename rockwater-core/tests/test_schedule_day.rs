use chrono::{TimeZone, Utc};
use rockwater_core::{
    DurationLimits, PointInTime, ScheduleError, TaskNode, compute_schedule, greedy_duration,
    min_duration, rescale, summarize, toggle_anchor,
};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("day.json")
}

fn load_day() -> Vec<TaskNode> {
    let s = std::fs::read_to_string(fixture_path()).unwrap();
    serde_json::from_str(&s).unwrap()
}

fn at(h: u32, m: u32) -> PointInTime {
    Utc.with_ymd_and_hms(2026, 2, 21, h, m, 0).unwrap()
}

fn start_of(out: &[TaskNode], id: &str) -> Option<PointInTime> {
    out.iter().find(|t| t.id == id).and_then(|t| t.start_time)
}

/// Snapshot regression: a realistic day with a nested report, a ghost and two rocks.
#[test]
fn test_day_snapshot_schedule() {
    let tasks = load_day();
    let out = compute_schedule(&tasks, at(8, 0)).unwrap();

    let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["inbox", "standup", "report", "gym", "numbers", "lunch"]);

    // report = 30 own + 35 numbers (top-level copy is current) + 25 draft; charts done.
    let report = out.iter().find(|t| t.id == "report").unwrap();
    assert_eq!(report.duration, 90);
    assert_eq!(report.original_duration, Some(30));

    // Too long for the 08:20-09:00 gap, lands after standup.
    assert_eq!(start_of(&out, "report"), Some(at(9, 15)));
    assert_eq!(start_of(&out, "gym"), Some(at(10, 45)));
    assert_eq!(start_of(&out, "numbers"), Some(at(10, 45)));
    assert_eq!(start_of(&out, "lunch"), Some(at(12, 0)));

    let s = summarize(&out);
    assert_eq!((s.rocks, s.water, s.ghosts), (2, 3, 1));
    assert_eq!(s.busy_minutes, 220);
    assert_eq!(s.ends_at, Some(at(13, 0)));
}

#[test]
fn test_day_snapshot_rollup_trace() {
    let tasks = load_day();
    let registry = rockwater_core::TaskRegistry::from_tasks(&tasks);
    let report = tasks.iter().find(|t| t.id == "report").unwrap();

    let r = greedy_duration(report, Some(&registry));
    assert_eq!(r.total, 90);
    assert_eq!(
        r.trace,
        vec!["Base: 30m", "+35m from Pull numbers", "+25m from Draft"]
    );

    // Without the registry the stale embedded copy (20m) is used.
    assert_eq!(greedy_duration(report, None).total, 75);
    assert_eq!(min_duration(report, Some(&registry)), 60);
}

#[test]
fn test_rescheduled_output_round_trips_through_json() {
    let out = compute_schedule(&load_day(), at(8, 0)).unwrap();
    let json = serde_json::to_string(&out).unwrap();
    let back: Vec<TaskNode> = serde_json::from_str(&json).unwrap();

    assert_eq!(compute_schedule(&back, at(8, 0)).unwrap(), out);
}

#[test]
fn test_anchoring_report_after_standup_pushes_it_behind_standup() {
    let tasks = load_day();
    // Pin the report at 08:30. Standup is earlier in the list, so it is the
    // upstream rock and the report waits for it to end.
    let tasks = toggle_anchor(&tasks, "report", Some(at(8, 30))).unwrap();
    let out = compute_schedule(&tasks, at(8, 0)).unwrap();

    assert_eq!(start_of(&out, "standup"), Some(at(9, 0)));
    assert_eq!(start_of(&out, "report"), Some(at(9, 15)));
    // With the report out of the way, numbers fits before standup.
    assert_eq!(start_of(&out, "numbers"), Some(at(8, 20)));
    assert_eq!(start_of(&out, "lunch"), Some(at(12, 0)));

    // Shrinking below the open subtasks (35 + 25) is refused by the floor.
    let tasks = rescale(&tasks, "report", 1, DurationLimits::default()).unwrap();
    let report = tasks.iter().find(|t| t.id == "report").unwrap();
    assert_eq!(report.duration, 60);
    assert_eq!(report.original_duration, None);
}

#[test]
fn test_malformed_snapshot_is_rejected_without_partial_output() {
    let mut tasks = load_day();
    tasks[1].start_time = None;

    assert_eq!(
        compute_schedule(&tasks, at(8, 0)).unwrap_err(),
        ScheduleError::MissingStartTime {
            id: "standup".into()
        }
    );
}
