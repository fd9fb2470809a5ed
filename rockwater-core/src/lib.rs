//! rockwater-core: rock-and-water scheduling and duration rollup.
//!
//! Pure and synchronous: `(tasks, now) -> scheduled tasks`. No I/O, no logging,
//! no shared state between calls.

pub mod edits;
pub mod error;
pub mod registry;
pub mod rollup;
pub mod schedule;
pub mod task;
pub mod time;

pub use edits::{
    DurationLimits, MIN_DURATION_MINUTES, archive, reorder, rescale, toggle_anchor, toggle_done,
};
pub use error::ScheduleError;
pub use registry::TaskRegistry;
pub use rollup::{Rollup, greedy_duration, min_duration};
pub use schedule::{ScheduleSummary, Slot, compute_schedule, slot_of, summarize};
pub use task::{TaskNode, TaskStatus};
pub use time::PointInTime;
