//! Duration rollup: a task's "greedy" time commitment.
//!
//! total = own duration of the root + own durations of every outstanding
//! descendant, each id counted at most once per call.
//!
//! Rules:
//! - own duration comes from the registry when it knows the id, else from
//!   `original_duration`, else `duration`
//! - an id already on the current path is a cycle edge and contributes 0
//! - an id already counted anywhere in this call (diamond) contributes 0
//! - a done descendant contributes 0 and its subtree is skipped
//! - the queried root is always summed with its subtree, even when done

use std::collections::HashSet;

use crate::registry::TaskRegistry;
use crate::task::TaskNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollup {
    /// Minutes. Accumulated as i64 so no sum of i32 durations can overflow.
    pub total: i64,
    /// "Base: {own}m" followed by "+{m}m from {title}" per contributing descendant.
    pub trace: Vec<String>,
}

/// Total greedy duration of `root` including outstanding subtasks.
pub fn greedy_duration(root: &TaskNode, registry: Option<&TaskRegistry>) -> Rollup {
    let own = i64::from(own_duration(root, registry));

    let mut walk = Walk {
        registry,
        visiting: HashSet::new(),
        visited: HashSet::new(),
        trace: vec![format!("Base: {own}m")],
    };
    walk.visiting.insert(root.id.as_str());
    walk.visited.insert(root.id.as_str());

    let nested: i64 = root.children.iter().map(|c| walk.visit(c)).sum();

    Rollup {
        total: own + nested,
        trace: walk.trace,
    }
}

/// Minutes of outstanding subtask work under `node`, excluding its own time.
///
/// Used as the floor when shrinking a parent task.
pub fn min_duration(node: &TaskNode, registry: Option<&TaskRegistry>) -> i64 {
    greedy_duration(node, registry).total - i64::from(own_duration(node, registry))
}

/// Own duration with the registry taking precedence over the embedded copy.
pub fn own_duration(node: &TaskNode, registry: Option<&TaskRegistry>) -> i32 {
    registry
        .and_then(|r| r.own_duration(&node.id))
        .unwrap_or_else(|| node.own_duration())
}

struct Walk<'a> {
    registry: Option<&'a TaskRegistry>,
    // Ids on the current DFS path.
    visiting: HashSet<&'a str>,
    // Ids already counted in this call.
    visited: HashSet<&'a str>,
    trace: Vec<String>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, node: &'a TaskNode) -> i64 {
        let id = node.id.as_str();
        if self.visiting.contains(id) || !self.visited.insert(id) {
            return 0;
        }
        if node.is_done() {
            return 0;
        }

        let own = own_duration(node, self.registry);
        if own != 0 {
            self.trace.push(format!("+{own}m from {}", node.title));
        }

        self.visiting.insert(id);
        let nested: i64 = node.children.iter().map(|c| self.visit(c)).sum();
        self.visiting.remove(id);

        i64::from(own) + nested
    }
}
