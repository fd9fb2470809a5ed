//! Task-list edits applied before rescheduling.
//!
//! Every edit takes a snapshot and returns a new one. Edits addressed by id hit
//! every copy of that id (top-level and nested) so embedded children don't go
//! stale.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::registry::TaskRegistry;
use crate::rollup::min_duration;
use crate::task::{TaskNode, TaskStatus};
use crate::time::PointInTime;

pub const MIN_DURATION_MINUTES: i32 = 2;

/// Bounds a user-entered duration must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationLimits {
    pub floor: i32,
    pub cap: Option<i32>,
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            floor: MIN_DURATION_MINUTES,
            cap: None,
        }
    }
}

impl DurationLimits {
    pub fn new(floor: i32, cap: Option<i32>) -> Self {
        Self { floor, cap }
    }

    pub fn clamp(&self, minutes: i32) -> i32 {
        self.clamp_with_floor(minutes, self.floor)
    }

    /// Clamp for a specific task: its outstanding subtasks raise the floor, and
    /// the cap never undercuts that floor.
    ///
    /// Errors with `DurationOverflow` when the open subtasks alone exceed `i32`
    /// minutes.
    pub fn clamp_for(
        &self,
        task: &TaskNode,
        minutes: i32,
        registry: Option<&TaskRegistry>,
    ) -> Result<i32> {
        let subtasks = i32::try_from(min_duration(task, registry)).map_err(|_| {
            ScheduleError::DurationOverflow {
                id: task.id.clone(),
            }
        })?;
        Ok(self.clamp_with_floor(minutes, self.floor.max(subtasks)))
    }

    fn clamp_with_floor(&self, minutes: i32, floor: i32) -> i32 {
        let m = minutes.max(floor);
        match self.cap {
            Some(cap) => m.min(cap.max(floor)),
            None => m,
        }
    }
}

/// Set a task's own duration, clamped by `limits`.
///
/// `minutes` is the task's own time, not its footprint. The floor is the sum of
/// its open subtasks, so after rescheduling a parent occupies its own minutes
/// plus that sum: asking for 5m on a parent with 20m of open subtasks stores
/// 20m and schedules 40m.
pub fn rescale(
    tasks: &[TaskNode],
    id: &str,
    minutes: i32,
    limits: DurationLimits,
) -> Result<Vec<TaskNode>> {
    let registry = TaskRegistry::from_tasks(tasks);
    let task = find(tasks, id)?;
    let minutes = limits.clamp_for(task, minutes, Some(&registry))?;

    update_all(tasks, id, |t| {
        t.duration = minutes;
        t.original_duration = None;
        Ok(())
    })
}

pub fn toggle_done(tasks: &[TaskNode], id: &str) -> Result<Vec<TaskNode>> {
    let next = match find(tasks, id)?.status {
        TaskStatus::Todo => TaskStatus::Done,
        TaskStatus::Done => TaskStatus::Todo,
    };
    update_all(tasks, id, |t| {
        t.status = next;
        Ok(())
    })
}

/// Flip rock/water.
///
/// Anchoring uses `at`, falling back to the task's last start time. Un-anchoring
/// leaves `start_time` in place; the scheduler overwrites it.
pub fn toggle_anchor(
    tasks: &[TaskNode],
    id: &str,
    at: Option<PointInTime>,
) -> Result<Vec<TaskNode>> {
    let task = find(tasks, id)?;
    if task.is_anchored {
        return update_all(tasks, id, |t| {
            t.is_anchored = false;
            Ok(())
        });
    }

    let start = at
        .or(task.start_time)
        .ok_or_else(|| ScheduleError::MissingStartTime { id: id.to_string() })?;
    update_all(tasks, id, |t| {
        t.is_anchored = true;
        t.start_time = Some(start);
        Ok(())
    })
}

/// Move the top-level task at `from` to position `to`.
pub fn reorder(tasks: &[TaskNode], from: usize, to: usize) -> Result<Vec<TaskNode>> {
    let len = tasks.len();
    for index in [from, to] {
        if index >= len {
            return Err(ScheduleError::IndexOutOfRange { index, len });
        }
    }

    let mut out = tasks.to_vec();
    let t = out.remove(from);
    out.insert(to, t);
    Ok(out)
}

/// Remove a top-level task, returning the remaining list and the archived task.
pub fn archive(tasks: &[TaskNode], id: &str) -> Result<(Vec<TaskNode>, TaskNode)> {
    let idx = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| ScheduleError::UnknownTask { id: id.to_string() })?;

    let mut out = tasks.to_vec();
    let archived = out.remove(idx);
    Ok((out, archived))
}

/// First node with `id`, top-level before nested.
fn find<'a>(tasks: &'a [TaskNode], id: &str) -> Result<&'a TaskNode> {
    fn nested<'a>(tasks: &'a [TaskNode], id: &str) -> Option<&'a TaskNode> {
        tasks
            .iter()
            .find_map(|t| if t.id == id { Some(t) } else { nested(&t.children, id) })
    }

    tasks
        .iter()
        .find(|t| t.id == id)
        .or_else(|| nested(tasks, id))
        .ok_or_else(|| ScheduleError::UnknownTask { id: id.to_string() })
}

fn update_all<F>(tasks: &[TaskNode], id: &str, mut f: F) -> Result<Vec<TaskNode>>
where
    F: FnMut(&mut TaskNode) -> Result<()>,
{
    fn walk<F>(nodes: &mut [TaskNode], id: &str, f: &mut F) -> Result<usize>
    where
        F: FnMut(&mut TaskNode) -> Result<()>,
    {
        let mut hits = 0;
        for n in nodes.iter_mut() {
            if n.id == id {
                f(n)?;
                hits += 1;
            }
            hits += walk(&mut n.children, id, f)?;
        }
        Ok(hits)
    }

    let mut out = tasks.to_vec();
    if walk(&mut out, id, &mut f)? == 0 {
        return Err(ScheduleError::UnknownTask { id: id.to_string() });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::compute_schedule;
    use chrono::{TimeZone, Utc};

    fn at(h: u32, m: u32) -> PointInTime {
        Utc.with_ymd_and_hms(2026, 2, 21, h, m, 0).unwrap()
    }

    fn task(id: &str, minutes: i32) -> TaskNode {
        TaskNode::new(id, id).with_duration(minutes)
    }

    #[test]
    fn clamp_applies_floor_and_cap() {
        let limits = DurationLimits::new(2, Some(240));
        assert_eq!(limits.clamp(0), 2);
        assert_eq!(limits.clamp(45), 45);
        assert_eq!(limits.clamp(600), 240);
        assert_eq!(DurationLimits::default().clamp(1), MIN_DURATION_MINUTES);
    }

    #[test]
    fn rescale_cannot_shrink_parent_below_open_subtasks() {
        let parent = task("p", 60)
            .with_child(task("a", 20))
            .with_child(task("b", 25).done());
        let out = rescale(&[parent], "p", 5, DurationLimits::default()).unwrap();
        assert_eq!(out[0].duration, 20);

        // Own minutes plus the open subtask.
        let scheduled = compute_schedule(&out, at(8, 0)).unwrap();
        assert_eq!(scheduled[0].duration, 40);
        assert_eq!(scheduled[0].original_duration, Some(20));
    }

    #[test]
    fn subtask_floor_past_i32_is_an_overflow_error() {
        let parent = task("p", 10)
            .with_child(task("a", i32::MAX))
            .with_child(task("b", 1));
        let err = rescale(&[parent], "p", 5, DurationLimits::default()).unwrap_err();
        assert_eq!(err, ScheduleError::DurationOverflow { id: "p".into() });
    }

    #[test]
    fn subtask_floor_beats_cap() {
        let parent = task("p", 60).with_child(task("a", 90));
        let out = rescale(&[parent], "p", 200, DurationLimits::new(2, Some(30))).unwrap();
        assert_eq!(out[0].duration, 90);
    }

    #[test]
    fn rescale_updates_nested_copies_and_clears_original() {
        let child = task("c", 10).with_original_duration(10);
        let tasks = [task("p", 30).with_child(child.clone()), child];

        let out = rescale(&tasks, "c", 40, DurationLimits::default()).unwrap();
        assert_eq!(out[0].children[0].duration, 40);
        assert_eq!(out[1].duration, 40);
        assert_eq!(out[1].original_duration, None);
        // input untouched
        assert_eq!(tasks[1].duration, 10);
    }

    #[test]
    fn toggle_done_flips_both_ways() {
        let tasks = [task("a", 30)];
        let done = toggle_done(&tasks, "a").unwrap();
        assert!(done[0].is_done());
        assert!(!toggle_done(&done, "a").unwrap()[0].is_done());
        assert_eq!(
            toggle_done(&tasks, "nope").unwrap_err(),
            ScheduleError::UnknownTask { id: "nope".into() }
        );
    }

    #[test]
    fn toggle_anchor_needs_a_time() {
        let tasks = [task("a", 30)];
        assert!(matches!(
            toggle_anchor(&tasks, "a", None),
            Err(ScheduleError::MissingStartTime { .. })
        ));

        let rocked = toggle_anchor(&tasks, "a", Some(at(9, 0))).unwrap();
        assert!(rocked[0].is_anchored);
        assert_eq!(rocked[0].start_time, Some(at(9, 0)));

        let watered = toggle_anchor(&rocked, "a", None).unwrap();
        assert!(!watered[0].is_anchored);
    }

    #[test]
    fn reorder_moves_and_checks_bounds() {
        let tasks = [task("a", 10), task("b", 10), task("c", 10)];
        let out = reorder(&tasks, 2, 0).unwrap();
        let ids: Vec<_> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        assert_eq!(
            reorder(&tasks, 0, 3).unwrap_err(),
            ScheduleError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn archive_removes_top_level_task() {
        let tasks = [task("a", 10), task("b", 20)];
        let (rest, gone) = archive(&tasks, "a").unwrap();
        assert_eq!(gone.id, "a");
        assert_eq!(rest.len(), 1);
        assert!(archive(&rest, "a").is_err());
    }

    #[test]
    fn schedule_follows_edits() {
        let now = at(8, 0);
        let tasks = [task("w1", 30), task("w2", 30), task("r", 60).anchored_at(at(9, 0))];

        // Growing w1 pushes w2 past the rock.
        let grown = rescale(&tasks, "w1", 45, DurationLimits::default()).unwrap();
        let out = compute_schedule(&grown, now).unwrap();
        let w2 = out.iter().find(|t| t.id == "w2").unwrap();
        assert_eq!(w2.start_time, Some(at(10, 0)));

        // Completing w1 turns it into a ghost and w2 moves up to now.
        let done = toggle_done(&grown, "w1").unwrap();
        let out = compute_schedule(&done, now).unwrap();
        let w2 = out.iter().find(|t| t.id == "w2").unwrap();
        assert_eq!(w2.start_time, Some(now));
    }
}
