//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods to wait for work.
//! **Exceptions**: The TUI frame tick in `tui/src/app.rs`, test code.

use architectural_enforcement::{assert_no_violations, production_sources};

fn sleep_violations(dir: &str, allow_frame_tick: bool) -> Vec<String> {
    let mut violations = Vec::new();
    for source in production_sources(dir) {
        let is_app = source.path.ends_with("tui/src/app.rs");
        for (line_number, code) in source.code_lines() {
            if !(code.contains("::sleep(") || code.contains(".sleep(")) {
                continue;
            }
            if allow_frame_tick && is_app && code.contains("FRAME_DURATION") {
                continue;
            }
            violations.push(format!(
                "{}:{}: {}",
                source.path.display(),
                line_number,
                code.trim()
            ));
        }
    }
    violations
}

#[test]
fn test_no_sleep_in_harness_core() {
    assert_no_violations(
        "sleep in harness core (wait on channels instead)",
        &sleep_violations("harness/core/src", false),
    );
}

#[test]
fn test_tui_only_sleeps_for_frame_tick() {
    assert_no_violations(
        "sleep in TUI outside the frame tick",
        &sleep_violations("tui/src", true),
    );
}
