//! Integration Test: Panic Prohibition
//!
//! **Policy**: Production code propagates errors. `unwrap()` and `expect()`
//! are for tests only.

use architectural_enforcement::{assert_no_violations, production_sources};

#[test]
fn test_no_unwrap_or_expect_in_production_code() {
    let mut violations = Vec::new();
    for dir in ["harness/core/src", "tui/src"] {
        for source in production_sources(dir) {
            for (line_number, code) in source.code_lines() {
                if code.contains(".unwrap()") || code.contains(".expect(") {
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

    assert_no_violations("unwrap/expect in production code", &violations);
}
