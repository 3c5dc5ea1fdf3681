use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::common::read_text_lossy;
use crate::error::Result;
use crate::scanner::{Finding, check_tags};

#[derive(Serialize)]
struct FileFindings {
    file: String,
    findings: Vec<Finding>,
}

/// Scan each file for AWS resources missing tags and print the misses.
///
/// Only missing-tag findings surface; a file that cannot be read is logged
/// and skipped without aborting the rest of the batch. Returns the total
/// number of missing findings so the caller can apply strict-mode exit
/// semantics.
pub fn handle_check_tags(files: &[PathBuf], json: bool) -> Result<usize> {
    let mut reports = Vec::new();

    for file in files {
        let content = match read_text_lossy(file) {
            Ok(content) => content,
            Err(err) => {
                log::error!("skipping {}: {}", file.display(), err);
                continue;
            }
        };
        let findings: Vec<Finding> = check_tags(&content)
            .into_iter()
            .filter(Finding::is_missing)
            .collect();
        log::debug!("{}: {} missing-tag findings", file.display(), findings.len());
        reports.push(FileFindings {
            file: file.display().to_string(),
            findings,
        });
    }

    let total = reports.iter().map(|r| r.findings.len()).sum();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            for finding in &report.findings {
                println!(
                    "{} {}: Line {} - '{}' missing 'tags'.",
                    "⚠️ WARNING:".yellow().bold(),
                    report.file,
                    finding.line,
                    finding.subject
                );
            }
        }
        if total == 0 {
            println!("{}", "✅ All AWS resources have 'tags'.".green());
        }
    }

    Ok(total)
}
