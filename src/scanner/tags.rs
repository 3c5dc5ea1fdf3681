//! Tag presence checking for Terraform files.
//!
//! Walks a file line by line, treats every AWS resource declaration (and
//! every module whose name suggests a taggable AWS service) as a block, and
//! checks whether the block carries an active `tags = ...` assignment on a
//! non-comment line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::scanner::block::extract_block;

static TAGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\btags\s*=").unwrap());
static RESOURCE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"resource\s+"([^"]+)"\s+"([^"]+)""#).unwrap());
static MODULE_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"module\s+"([^"]+)""#).unwrap());

/// Module names containing any of these substrings are treated as wrapping
/// taggable AWS infrastructure and get the same tag check as a resource.
pub const MODULE_KEYWORDS: &[&str] = &["rds", "postgres", "db", "database", "ec2", "aurora"];

/// Outcome of the tag check for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Present,
    Missing,
}

/// One compliance check result, ordered by the position of its declaration
/// header in the file. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Resource identifier (`aws_s3_bucket.x`) or module name.
    pub subject: String,
    /// 1-based line number of the declaration header.
    pub line: usize,
    pub verdict: Verdict,
    /// The raw text of the extracted block.
    pub block_text: String,
}

impl Finding {
    pub fn is_missing(&self) -> bool {
        self.verdict == Verdict::Missing
    }
}

/// Check every qualifying block in `content` for a tags assignment.
///
/// Findings come back in file order and include both verdicts; the
/// reporting layer surfaces only the missing ones.
pub fn check_tags(content: &str) -> Vec<Finding> {
    let lines: Vec<&str> = content.lines().collect();
    let mut findings = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        if trimmed.contains("resource") && trimmed.contains("aws_") {
            let (block, next) = extract_block(&lines, i);
            findings.push(Finding {
                subject: resource_subject(trimmed),
                line: i + 1,
                verdict: block_verdict(block.lines(&lines)),
                block_text: block.text(&lines),
            });
            i = next;
        } else if trimmed.starts_with("module") {
            match taggable_module_name(trimmed) {
                Some(name) => {
                    let (block, next) = extract_block(&lines, i);
                    findings.push(Finding {
                        subject: name,
                        line: i + 1,
                        verdict: block_verdict(block.lines(&lines)),
                        block_text: block.text(&lines),
                    });
                    i = next;
                }
                // Name missing or not on the allowlist: advance by one line
                // only, so resources nested inside this module body are
                // still visited and checked on their own.
                None => i += 1,
            }
        } else {
            i += 1;
        }
    }

    findings
}

/// Extract the module name and keep it only if it matches the allowlist.
fn taggable_module_name(header: &str) -> Option<String> {
    let name = MODULE_NAME_RE.captures(header)?.get(1)?.as_str().to_string();
    let lowered = name.to_lowercase();
    MODULE_KEYWORDS
        .iter()
        .any(|kw| lowered.contains(kw))
        .then_some(name)
}

fn resource_subject(header: &str) -> String {
    match RESOURCE_NAME_RE.captures(header) {
        Some(caps) => format!("{}.{}", &caps[1], &caps[2]),
        None => header.trim_end_matches('{').trim().to_string(),
    }
}

/// A block satisfies the check if any non-comment line assigns `tags`.
fn block_verdict(block_lines: &[&str]) -> Verdict {
    let present = block_lines
        .iter()
        .filter(|line| !is_comment(line))
        .any(|line| TAGS_RE.is_match(line));
    if present {
        Verdict::Present
    } else {
        Verdict::Missing
    }
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with("//")
}
