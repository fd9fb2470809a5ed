//! TaskRegistry: id -> most current node.
//!
//! Embedded `children` are copies and can go stale when a child is edited on
//! its own. The registry keeps one canonical node per id so rollup can read the
//! current own duration instead of whatever the parent cached.

use std::collections::{HashMap, HashSet};

use crate::task::TaskNode;

#[derive(Debug, Default, Clone)]
pub struct TaskRegistry {
    tasks: HashMap<String, TaskNode>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a snapshot. Top-level nodes win over nested copies of the same id;
    /// among nested copies the first one reached depth-first wins.
    pub fn from_tasks(tasks: &[TaskNode]) -> Self {
        let mut reg = Self::new();
        for t in tasks {
            reg.upsert(t.clone());
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for t in tasks {
            reg.index_nested(&t.children, &mut seen);
        }
        reg
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TaskNode> {
        self.tasks.get(id)
    }

    /// Insert or replace the canonical node for its id.
    pub fn upsert(&mut self, task: TaskNode) -> Option<TaskNode> {
        self.tasks.insert(task.id.clone(), task)
    }

    /// Own duration of the registered node, if any.
    pub fn own_duration(&self, id: &str) -> Option<i32> {
        self.tasks.get(id).map(TaskNode::own_duration)
    }

    fn index_nested<'a>(&mut self, children: &'a [TaskNode], seen: &mut HashSet<&'a str>) {
        for c in children {
            if !seen.insert(c.id.as_str()) {
                continue;
            }
            if !self.contains(&c.id) {
                self.upsert(c.clone());
            }
            self.index_nested(&c.children, seen);
        }
    }
}
