//! Rock-and-water scheduler.
//!
//! Rocks are anchored tasks: they sit at their declared start unless the rock
//! before them in the list is still running, in which case they start when it
//! ends.
//! Water is everything else: placed greedily from `now`, filling the gap before
//! the next rock when it fits and leapfrogging past the rock when it doesn't.
//! Done tasks are ghosts, anchored or not: they sit at the water cursor with
//! no width and never push a rock or block water.
//!
//! Durations are expanded by the rollup engine before anything is placed, so a
//! parent's footprint includes its outstanding subtasks.

use crate::error::{Result, ScheduleError};
use crate::registry::TaskRegistry;
use crate::rollup::{greedy_duration, own_duration};
use crate::task::TaskNode;
use crate::time::{PointInTime, checked_add_minutes};

/// How a scheduled task occupies the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Rock,
    Water,
    Ghost,
}

pub fn slot_of(task: &TaskNode) -> Slot {
    if task.is_done() {
        Slot::Ghost
    } else if task.is_anchored {
        Slot::Rock
    } else {
        Slot::Water
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: PointInTime,
    end: PointInTime,
}

/// Compute start times for every task.
///
/// Returns new nodes sorted by computed start (ties keep input order). Each
/// non-done node's `duration` is its rolled-up total and `original_duration`
/// is pinned to its own minutes, so the output can be fed back in unchanged.
///
/// Fails with `DurationOverflow` when a rolled-up duration does not fit in
/// `i32` minutes or a task would end past the representable range of time.
pub fn compute_schedule(tasks: &[TaskNode], now: PointInTime) -> Result<Vec<TaskNode>> {
    validate(tasks)?;

    let registry = TaskRegistry::from_tasks(tasks);
    let mut placed = tasks
        .iter()
        .map(|t| expand(t, &registry))
        .collect::<Result<Vec<_>>>()?;

    let rocks = place_rocks(&mut placed)?;
    place_water(&mut placed, &rocks, now)?;

    // Stable: equal starts keep input order.
    placed.sort_by_key(|t| t.start_time);
    Ok(placed)
}

fn validate(tasks: &[TaskNode]) -> Result<()> {
    for t in tasks {
        if t.is_anchored && t.start_time.is_none() {
            return Err(ScheduleError::MissingStartTime { id: t.id.clone() });
        }
    }
    check_durations(tasks)
}

fn check_durations(tasks: &[TaskNode]) -> Result<()> {
    for t in tasks {
        let minutes = t.duration.min(t.original_duration.unwrap_or(0));
        if minutes < 0 {
            return Err(ScheduleError::NegativeDuration {
                id: t.id.clone(),
                minutes,
            });
        }
        check_durations(&t.children)?;
    }
    Ok(())
}

fn expand(task: &TaskNode, registry: &TaskRegistry) -> Result<TaskNode> {
    let own = own_duration(task, Some(registry));
    let mut out = task.clone();
    out.original_duration = Some(own);
    out.duration = if task.is_done() {
        own
    } else {
        let total = greedy_duration(task, Some(registry)).total;
        i32::try_from(total).map_err(|_| overflow(task))?
    };
    Ok(out)
}

fn overflow(task: &TaskNode) -> ScheduleError {
    ScheduleError::DurationOverflow {
        id: task.id.clone(),
    }
}

/// Place open anchored tasks in input order. Each rock starts at its declared
/// time or when the previous rock in the list ends, whichever is later, so
/// pushes cascade downstream and rocks never overlap.
fn place_rocks(placed: &mut [TaskNode]) -> Result<Vec<Span>> {
    let mut rocks: Vec<Span> = Vec::new();
    let mut prev_end: Option<PointInTime> = None;

    for t in placed.iter_mut().filter(|t| t.is_anchored && !t.is_done()) {
        let declared = t
            .start_time
            .ok_or_else(|| ScheduleError::MissingStartTime { id: t.id.clone() })?;
        let start = prev_end.map_or(declared, |end| end.max(declared));
        let end = checked_add_minutes(start, t.width()).ok_or_else(|| overflow(t))?;

        t.start_time = Some(start);
        rocks.push(Span { start, end });
        prev_end = Some(end);
    }

    // Zero-minute rocks never block water.
    rocks.retain(|r| r.end > r.start);
    rocks.sort_by_key(|r| r.start);
    Ok(rocks)
}

/// Place water from `now` and drop every ghost at the cursor as it passes.
fn place_water(placed: &mut [TaskNode], rocks: &[Span], now: PointInTime) -> Result<()> {
    let mut cursor = now;

    for t in placed.iter_mut().filter(|t| !t.is_anchored || t.is_done()) {
        if t.is_done() {
            t.start_time = Some(cursor);
            continue;
        }

        let start = first_fit(cursor, t.duration, rocks).ok_or_else(|| overflow(t))?;
        t.start_time = Some(start);
        cursor = checked_add_minutes(start, t.duration).ok_or_else(|| overflow(t))?;
    }
    Ok(())
}

/// Earliest start >= `cursor` where `minutes` fits without overlapping a rock.
/// Ending exactly when a rock starts is a fit.
fn first_fit(mut cursor: PointInTime, minutes: i32, rocks: &[Span]) -> Option<PointInTime> {
    for r in rocks {
        if r.end <= cursor {
            continue;
        }
        if checked_add_minutes(cursor, minutes)? <= r.start {
            break;
        }
        // leapfrog
        cursor = cursor.max(r.end);
    }
    Some(cursor)
}

/// Shape of a computed schedule, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub starts_at: Option<PointInTime>,
    pub ends_at: Option<PointInTime>,
    /// Sum of widths; ghosts add nothing.
    pub busy_minutes: i64,
    pub rocks: usize,
    pub water: usize,
    pub ghosts: usize,
}

pub fn summarize(scheduled: &[TaskNode]) -> ScheduleSummary {
    let mut s = ScheduleSummary::default();

    for t in scheduled {
        match slot_of(t) {
            Slot::Rock => s.rocks += 1,
            Slot::Water => s.water += 1,
            Slot::Ghost => s.ghosts += 1,
        }
        s.busy_minutes += i64::from(t.width());
        s.starts_at = match (s.starts_at, t.start_time) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        s.ends_at = match (s.ends_at, t.end_time()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    s
}
