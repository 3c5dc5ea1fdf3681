//! # Scanner Module
//!
//! Block-scoped text scanning for governance checks:
//! - brace-balance block extraction shared by every checker
//! - Terraform tag presence checking
//! - Jenkins pipeline stage/tool extraction
//! - docker agent and shell-script extraction
//! - Vault usage extraction
//! - Dockerfile/compose base-image inventory
//! - YAML indentation validation and repair
//! - governance-file inventory

pub mod agents;
pub mod block;
pub mod docker;
pub mod hygiene;
pub mod indent;
pub mod stages;
pub mod tags;
pub mod vault;

pub use agents::{AgentRecord, extract_docker_agents};
pub use block::{Block, extract_block};
pub use docker::{DockerRecord, docker_inventory};
pub use hygiene::{HygieneRecord, INVENTORY_TARGETS, inspect_repo};
pub use indent::{IndentIssue, check_indentation, fix_indentation};
pub use stages::{FileSummary, StageRecord, ToolKeywords, extract_stages, summarize};
pub use tags::{Finding, Verdict, check_tags};
pub use vault::{GLOBAL_SCOPE, UsageRecord, extract_vault_usage};
