//! Integration Test: Core Layering
//!
//! The harness core is headless. It MUST NOT depend on, or import, the
//! terminal stack or the CLI parser; those belong to the TUI crate.

use std::fs;

use architectural_enforcement::{assert_no_violations, production_sources, workspace_root};

const UI_CRATES: [&str; 3] = ["ratatui", "crossterm", "clap"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("harness/core/Cargo.toml"))
        .expect("harness/core/Cargo.toml should exist");

    let violations: Vec<String> = manifest
        .lines()
        .filter(|line| {
            UI_CRATES
                .iter()
                .any(|name| line.trim_start().starts_with(&format!("{name} ")))
        })
        .map(|line| format!("harness/core/Cargo.toml: {}", line.trim()))
        .collect();

    assert_no_violations("UI dependency in harness core", &violations);
}

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let sources = production_sources("harness/core/src");
    assert!(!sources.is_empty(), "harness core sources not found");

    let mut violations = Vec::new();
    for source in &sources {
        for (line_number, code) in source.code_lines() {
            for name in UI_CRATES {
                if code.contains(&format!("{name}::")) {
                    violations.push(format!(
                        "{}:{}: {}",
                        source.path.display(),
                        line_number,
                        code.trim()
                    ));
                }
            }
        }
    }

    assert_no_violations("UI crate used in harness core", &violations);
}
