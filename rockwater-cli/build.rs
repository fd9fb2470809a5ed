//! Stamps the binary with ROCKWATER_BUILD_SHA for `rockwater --version`.
//!
//! A pre-set ROCKWATER_BUILD_SHA wins (release tarballs have no .git);
//! otherwise the short HEAD hash of the enclosing checkout, else "unknown".

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const SHA_VAR: &str = "ROCKWATER_BUILD_SHA";

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_VAR}");

    let manifest_dir = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let repo_root = manifest_dir.join("..");

    let head = repo_root.join(".git").join("HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    let sha = env::var(SHA_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_short_sha(&repo_root))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_VAR}={}", sha.trim());
}

fn git_short_sha(repo_root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}
