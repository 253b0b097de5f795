//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The harness core stays free of terminal and CLI crates
//! - No sleep() calls in production code outside the TUI frame tick
//! - No unwrap()/expect() in production code
//!
//! Helpers here read the workspace sources; the checks live in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root (two levels above this package)
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// A production source file: its path and the lines before any test module
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Lines up to (not including) the first `#[cfg(test)]`
    pub production_lines: Vec<String>,
}

impl SourceFile {
    /// Numbered production lines with `//` comments removed
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.production_lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.split("//").next().unwrap_or(line)))
    }
}

/// Every `.rs` file under `dir` (relative to the workspace root)
#[must_use]
pub fn production_sources(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let base = root.join(dir);
    if !base.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(&base)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|entry| {
            let content = fs::read_to_string(entry.path()).ok()?;
            let production_lines = content
                .lines()
                .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
                .map(str::to_string)
                .collect();
            Some(SourceFile {
                path: entry
                    .path()
                    .strip_prefix(&root)
                    .unwrap_or(entry.path())
                    .to_path_buf(),
                production_lines,
            })
        })
        .collect()
}

/// Report violations and fail
///
/// # Panics
///
/// Panics when `violations` is non-empty.
pub fn assert_no_violations(rule: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s): {rule}", violations.len());
}
