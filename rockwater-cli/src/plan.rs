//! `rockwater plan|rollup|rescale`: run the core over a task snapshot and print it.

use anyhow::{Context, Result};
use chrono::{DurationRound, TimeDelta, Utc};
use rockwater_core::time::{format_clock, is_same_local_day, parse_local_to_utc};
use rockwater_core::{
    PointInTime, Slot, TaskNode, TaskRegistry, compute_schedule, greedy_duration, rescale,
    slot_of, summarize,
};
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::state::read_tasks;

/// `--now` in the configured zone, else the current minute.
pub fn resolve_now(now: Option<&str>, tz: &str) -> Result<PointInTime> {
    match now {
        Some(local) => parse_local_to_utc(local, tz),
        None => Ok(Utc::now().duration_trunc(TimeDelta::minutes(1))?),
    }
}

pub fn run_plan(tasks_path: &Path, now: Option<&str>, json: bool, cfg: &Config) -> Result<()> {
    let tasks = read_tasks(tasks_path)?;
    let now = resolve_now(now, &cfg.schedule.timezone)?;
    print_schedule(&tasks, now, json, cfg)
}

pub fn run_rollup(tasks_path: &Path, id: &str) -> Result<()> {
    let tasks = read_tasks(tasks_path)?;
    let registry = TaskRegistry::from_tasks(&tasks);
    let task = registry
        .get(id)
        .with_context(|| format!("task not found: {id}"))?;

    let rollup = greedy_duration(task, Some(&registry));
    debug!(id, total = rollup.total, "rolled up");

    println!("{} = {}m", task.title, rollup.total);
    for line in &rollup.trace {
        println!("  {line}");
    }
    Ok(())
}

pub fn run_rescale(
    tasks_path: &Path,
    id: &str,
    minutes: i32,
    now: Option<&str>,
    cfg: &Config,
) -> Result<()> {
    let tasks = read_tasks(tasks_path)?;
    let limits = cfg.schedule.limits();
    let tasks = rescale(&tasks, id, minutes, limits)?;

    if let Some(t) = tasks.iter().find(|t| t.id == id) {
        if t.duration != minutes {
            info!(id, requested = minutes, applied = t.duration, "duration clamped");
        }
    }

    let now = resolve_now(now, &cfg.schedule.timezone)?;
    print_schedule(&tasks, now, false, cfg)
}

fn print_schedule(tasks: &[TaskNode], now: PointInTime, json: bool, cfg: &Config) -> Result<()> {
    let tz = cfg.schedule.timezone.as_str();
    let scheduled = compute_schedule(tasks, now).context("computing schedule")?;
    info!(tasks = scheduled.len(), "schedule computed");

    if json {
        println!("{}", serde_json::to_string_pretty(&scheduled)?);
        return Ok(());
    }

    println!("# Plan from {} ({tz})\n", format_clock(now, tz)?);
    for t in &scheduled {
        let Some(start) = t.start_time else { continue };
        debug!(id = %t.id, start = %start, width = t.width(), "placed");

        let day = if is_same_local_day(start, now, tz)? { "" } else { " (other day)" };
        println!(
            "{}{day}  {:<5}  {} ({}m)",
            format_clock(start, tz)?,
            slot_label(slot_of(t)),
            t.title,
            t.duration
        );
    }

    let s = summarize(&scheduled);
    println!(
        "\n{} rocks, {} water, {} done; {}m busy",
        s.rocks, s.water, s.ghosts, s.busy_minutes
    );
    if let Some(end) = s.ends_at {
        println!("Clear after {}", format_clock(end, tz)?);
    }
    Ok(())
}

fn slot_label(slot: Slot) -> &'static str {
    match slot {
        Slot::Rock => "rock",
        Slot::Water => "water",
        Slot::Ghost => "ghost",
    }
}
