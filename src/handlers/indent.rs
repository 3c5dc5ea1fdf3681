use std::fs;
use std::path::PathBuf;

use colored::Colorize;

use crate::common::read_text_lossy;
use crate::error::Result;
use crate::scanner::{check_indentation, fix_indentation};

/// Validate YAML indentation for each file and print the violations.
/// Returns the total number of issues found.
pub fn handle_check_indent(files: &[PathBuf]) -> Result<usize> {
    let mut total = 0;

    for file in files {
        let content = match read_text_lossy(file) {
            Ok(content) => content,
            Err(err) => {
                log::error!("skipping {}: {}", file.display(), err);
                continue;
            }
        };
        let issues = check_indentation(&content);
        for issue in &issues {
            println!(
                "{} {}: Line {}: {}",
                "❌".red(),
                file.display(),
                issue.line,
                issue.message
            );
        }
        total += issues.len();
    }

    if total == 0 {
        println!("{}", "✅ YAML indentation is correct!".green());
    }

    Ok(total)
}

/// Rewrite each file in place with corrected indentation.
pub fn handle_fix_indent(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let content = match read_text_lossy(file) {
            Ok(content) => content,
            Err(err) => {
                log::error!("skipping {}: {}", file.display(), err);
                continue;
            }
        };
        let (fixed, changed) = fix_indentation(&content);
        if changed > 0 {
            fs::write(file, fixed)?;
            println!(
                "✅ Fixed YAML indentation in {} ({} lines)",
                file.display(),
                changed
            );
        } else {
            log::info!("{}: indentation already correct", file.display());
        }
    }
    Ok(())
}
