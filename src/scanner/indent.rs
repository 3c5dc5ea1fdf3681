//! YAML indentation validation and repair for pipeline definition files.
//!
//! Two layout rules apply to these files: list items (lines starting with
//! `-`) sit at exactly 4 spaces, everything else that is indented uses
//! 2-space indentation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DASH_AT_FOUR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{4}-").unwrap());
static DEEP_INDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{4,}").unwrap());

/// One indentation violation, 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndentIssue {
    pub line: usize,
    pub message: String,
}

/// Validate indentation without modifying anything.
pub fn check_indentation(content: &str) -> Vec<IndentIssue> {
    let mut issues = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let stripped = line.trim_start();

        if stripped.starts_with('-') && !DASH_AT_FOUR_RE.is_match(line) {
            issues.push(IndentIssue {
                line: i + 1,
                message: format!("'{}' should be indented with 4 spaces", stripped),
            });
        } else if !stripped.starts_with('-') && DEEP_INDENT_RE.is_match(line) {
            issues.push(IndentIssue {
                line: i + 1,
                message: format!("'{}' should use 2-space indentation", line.trim()),
            });
        }
    }

    issues
}

/// Rewrite `content` so that every line satisfies the indentation rules.
///
/// Returns the fixed text and the number of lines that changed. Output is
/// `\n`-joined with a trailing newline when the input had one.
pub fn fix_indentation(content: &str) -> (String, usize) {
    let mut fixed_lines = Vec::new();
    let mut changed = 0;

    for line in content.lines() {
        let stripped = line.trim_start();

        let fixed = if stripped.starts_with('-') && !DASH_AT_FOUR_RE.is_match(line) {
            format!("    {stripped}")
        } else if !stripped.starts_with('-') && DEEP_INDENT_RE.is_match(line) {
            format!("  {stripped}")
        } else {
            line.to_string()
        };

        if fixed != line {
            changed += 1;
        }
        fixed_lines.push(fixed);
    }

    let mut output = fixed_lines.join("\n");
    if content.ends_with('\n') {
        output.push('\n');
    }
    (output, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_file_has_no_issues() {
        let content = "steps:\n    - step: build\n  name: demo\n";
        assert!(check_indentation(content).is_empty());
    }

    #[test]
    fn test_dash_must_sit_at_four_spaces() {
        let content = "steps:\n  - step: build\n";
        let issues = check_indentation(content);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert!(issues[0].message.contains("4 spaces"));
    }

    #[test]
    fn test_deep_non_dash_indent_flagged() {
        let content = "top:\n      nested: value\n";
        let issues = check_indentation(content);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("2-space"));
    }

    #[test]
    fn test_two_space_indent_is_fine() {
        assert!(check_indentation("top:\n  nested: value\n").is_empty());
    }

    #[test]
    fn test_fix_rewrites_both_rules() {
        let content = "steps:\n  - step: build\n      nested: value\n";
        let (fixed, changed) = fix_indentation(content);
        assert_eq!(fixed, "steps:\n    - step: build\n  nested: value\n");
        assert_eq!(changed, 2);
    }

    #[test]
    fn test_fix_is_idempotent() {
        let content = "steps:\n  - step: build\n      nested: value\n";
        let (once, _) = fix_indentation(content);
        let (twice, changed) = fix_indentation(&once);
        assert_eq!(once, twice);
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_fixed_file_passes_check() {
        let content = "steps:\n  - step: build\n      nested: value\n";
        let (fixed, _) = fix_indentation(content);
        assert!(check_indentation(&fixed).is_empty());
    }

    #[test]
    fn test_trailing_newline_preserved() {
        let (with_nl, _) = fix_indentation("a: 1\n");
        assert!(with_nl.ends_with('\n'));
        let (without_nl, _) = fix_indentation("a: 1");
        assert!(!without_nl.ends_with('\n'));
    }
}
