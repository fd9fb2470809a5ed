use anyhow::{Context, Result};
use rockwater_core::TaskNode;
use std::fs;
use std::path::{Path, PathBuf};

pub fn rockwater_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".rockwater"))
}

pub fn ensure_rockwater_home() -> Result<PathBuf> {
    let dir = rockwater_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read a JSON task snapshot (array of task nodes).
pub fn read_tasks(path: &Path) -> Result<Vec<TaskNode>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse tasks in {}", path.display()))
}
