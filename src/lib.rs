//! # repogov CLI
//!
//! A Rust-based command-line application for CI/repository-governance
//! checks across a `teams/<team>/<repo>` directory tree:
//!
//! - **Tag linting**: flags AWS resources in Terraform files that have no
//!   active `tags` attribute
//! - **Indent checking**: validates and fixes YAML pipeline indentation
//! - **Inventory reports**: CSV reports on CI tool usage per pipeline
//!   stage and per Jenkinsfile, Vault usage per function scope, docker
//!   agent images and shell scripts per stage, Dockerfile/compose base
//!   images, and governance-file presence
//!
//! All checks share one core: a brace-balance block extractor that pulls a
//! structurally delimited region out of line-oriented text without a full
//! grammar, tolerating malformed input by degrading to best-effort matches.
//!
//! ## Example
//!
//! ```rust
//! use repogov_cli::scanner::check_tags;
//!
//! let findings = check_tags("resource \"aws_s3_bucket\" \"x\" {\n}\n");
//! assert!(findings[0].is_missing());
//! ```

pub mod cli;
pub mod common;
pub mod error;
pub mod handlers;
pub mod report;
pub mod scanner;

// Re-export commonly used types and functions
pub use error::{Result, ScanError};
pub use scanner::{Finding, StageRecord, ToolKeywords, UsageRecord, Verdict};
use cli::{Commands, InventoryReport};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute one CLI command, returning the process exit code.
///
/// Linter commands exit 0 even with findings; strict mode turns non-empty
/// findings into exit code 1.
pub fn run_command(command: Commands) -> Result<i32> {
    match command {
        Commands::CheckTags { files, strict, json } => {
            let missing = handlers::handle_check_tags(&files, json)?;
            Ok(strict_exit_code(strict, missing))
        }
        Commands::CheckIndent { files, strict } => {
            let issues = handlers::handle_check_indent(&files)?;
            Ok(strict_exit_code(strict, issues))
        }
        Commands::FixIndent { files } => {
            handlers::handle_fix_indent(&files)?;
            Ok(0)
        }
        Commands::Inventory { report } => {
            match report {
                InventoryReport::Tools { root, output, keywords } => {
                    handlers::handle_inventory_tools(&root, &output, keywords.as_deref())?
                }
                InventoryReport::Vaults { root, output } => {
                    handlers::handle_inventory_vaults(&root, &output)?
                }
                InventoryReport::Scripts { root, output } => {
                    handlers::handle_inventory_scripts(&root, &output)?
                }
                InventoryReport::Docker { root, output } => {
                    handlers::handle_inventory_docker(&root, &output)?
                }
                InventoryReport::Hygiene { root, output } => {
                    handlers::handle_inventory_hygiene(&root, &output)?
                }
            }
            Ok(0)
        }
    }
}

fn strict_exit_code(strict: bool, findings: usize) -> i32 {
    if strict && findings > 0 { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_exit_code() {
        assert_eq!(strict_exit_code(false, 5), 0);
        assert_eq!(strict_exit_code(true, 0), 0);
        assert_eq!(strict_exit_code(true, 5), 1);
    }
}
