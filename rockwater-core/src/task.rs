//! Task model for the rock-and-water scheduler.
//!
//! A `TaskNode` is either a rock (anchored to a start time) or water (floating).
//! Children are embedded copies; the graph they form is not guaranteed to be a
//! tree, so anything walking it must guard against diamonds and cycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::checked_add_minutes;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    /// Completed. Scheduled as a ghost: it keeps its duration for display but
    /// takes no width on the timeline.
    Done,
}

/// Core task type.
///
/// Note: storage (markdown notes, files) is an outer layer; the core only ever
/// sees snapshots of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: String,
    pub title: String,

    /// Minutes. After scheduling this holds the rolled-up value.
    pub duration: i32,

    /// Minutes. When set, authoritative for the task's own time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_duration: Option<i32>,

    #[serde(default)]
    pub is_anchored: bool,

    /// Required input for rocks; assigned to every task by the scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration: 30,
            original_duration: None,
            is_anchored: false,
            start_time: None,
            status: TaskStatus::Todo,
            children: Vec::new(),
        }
    }

    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.duration = minutes;
        self
    }

    pub fn with_original_duration(mut self, minutes: i32) -> Self {
        self.original_duration = Some(minutes);
        self
    }

    /// Make this task a rock at `start`.
    pub fn anchored_at(mut self, start: DateTime<Utc>) -> Self {
        self.is_anchored = true;
        self.start_time = Some(start);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn done(self) -> Self {
        self.with_status(TaskStatus::Done)
    }

    pub fn with_child(mut self, child: TaskNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TaskNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// The task's own minutes, ignoring any rollup baked into `duration`.
    pub fn own_duration(&self) -> i32 {
        self.original_duration.unwrap_or(self.duration)
    }

    /// Minutes this task occupies on the timeline.
    pub fn width(&self) -> i32 {
        match self.status {
            TaskStatus::Done => 0,
            TaskStatus::Todo => self.duration,
        }
    }

    /// `None` when unscheduled or when the end is not representable.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .and_then(|s| checked_add_minutes(s, self.width()))
    }
}
