use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repogov")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan team repositories for governance issues")]
#[command(
    long_about = "A CLI tool that lints Terraform files for missing AWS resource tags, validates and fixes YAML pipeline indentation, and inventories governance files and CI tool usage across a team/repo directory tree."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check Terraform files for AWS resources missing a 'tags' attribute
    CheckTags {
        /// Terraform files to scan
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Exit with status 1 when any resource is missing tags
        #[arg(long)]
        strict: bool,

        /// Print findings as JSON instead of warnings
        #[arg(long)]
        json: bool,
    },

    /// Validate YAML pipeline indentation
    CheckIndent {
        /// YAML files to validate
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Exit with status 1 when any file has indentation issues
        #[arg(long)]
        strict: bool,
    },

    /// Rewrite YAML pipeline files with corrected indentation
    FixIndent {
        /// YAML files to fix in place
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Generate CSV inventory reports over a team/repo directory tree
    Inventory {
        #[command(subcommand)]
        report: InventoryReport,
    },
}

#[derive(Subcommand)]
pub enum InventoryReport {
    /// Per-stage CI tool usage across all Jenkinsfiles
    Tools {
        /// Root directory containing team subdirectories
        #[arg(value_name = "ROOT_DIR")]
        root: PathBuf,

        /// Output directory for the CSV report
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// YAML file with a custom tool keyword list
        #[arg(long, value_name = "FILE")]
        keywords: Option<PathBuf>,
    },

    /// Vault usage (URLs, credentials, namespaces) across all Jenkinsfiles
    Vaults {
        /// Root directory containing team subdirectories
        #[arg(value_name = "ROOT_DIR")]
        root: PathBuf,

        /// Output directory for the CSV report
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Docker agent images and shell scripts per pipeline stage
    Scripts {
        /// Root directory containing team subdirectories
        #[arg(value_name = "ROOT_DIR")]
        root: PathBuf,

        /// Output directory for the CSV report
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Dockerfile and docker-compose base images per repository
    Docker {
        /// Root directory containing team subdirectories
        #[arg(value_name = "ROOT_DIR")]
        root: PathBuf,

        /// Output directory for the CSV report
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Presence of governance files and directories per repository
    Hygiene {
        /// Root directory containing team subdirectories
        #[arg(value_name = "ROOT_DIR")]
        root: PathBuf,

        /// Output directory for the CSV report
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tags_parses() {
        let cli = Cli::try_parse_from(["repogov", "check-tags", "main.tf", "--strict"]).unwrap();
        match cli.command {
            Commands::CheckTags { files, strict, json } => {
                assert_eq!(files, vec![PathBuf::from("main.tf")]);
                assert!(strict);
                assert!(!json);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_check_tags_requires_a_file() {
        assert!(Cli::try_parse_from(["repogov", "check-tags"]).is_err());
    }

    #[test]
    fn test_inventory_tools_defaults() {
        let cli = Cli::try_parse_from(["repogov", "inventory", "tools", "/repos"]).unwrap();
        match cli.command {
            Commands::Inventory {
                report: InventoryReport::Tools { root, output, keywords },
            } => {
                assert_eq!(root, PathBuf::from("/repos"));
                assert_eq!(output, PathBuf::from("output"));
                assert!(keywords.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_inventory_docker_parses() {
        let cli =
            Cli::try_parse_from(["repogov", "inventory", "docker", "/repos", "-o", "reports"])
                .unwrap();
        match cli.command {
            Commands::Inventory {
                report: InventoryReport::Docker { root, output },
            } => {
                assert_eq!(root, PathBuf::from("/repos"));
                assert_eq!(output, PathBuf::from("reports"));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["repogov", "check-indent", "a.yaml", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
