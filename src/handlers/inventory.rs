//! CSV inventory reports over a `root/<team>/<repo>` directory tree.
//!
//! Repositories are independent, so each one is scanned on a rayon worker;
//! per-repo row vectors are concatenated in tree order before the single
//! writer emits the CSV. A file that fails to read is logged and skipped
//! without aborting the batch.

use std::path::Path;

use glob::Pattern;
use once_cell::sync::Lazy;
use rayon::prelude::*;

use crate::common::{RepoEntry, find_files, is_git_repo, read_text_lossy, team_repos};
use crate::error::Result;
use crate::report::CsvReport;
use crate::scanner::{
    ToolKeywords, docker_inventory, extract_docker_agents, extract_stages, extract_vault_usage,
    inspect_repo, summarize,
};

static JENKINSFILE_PATTERN: Lazy<Pattern> =
    Lazy::new(|| Pattern::new("Jenkinsfile*").expect("valid glob pattern"));

const TOOLS_CSV: &str = "jenkins_pipeline_report_by_stage.csv";
const TOOLS_SUMMARY_CSV: &str = "jenkins_pipeline_report_by_jenkinsfile.csv";
const VAULTS_CSV: &str = "pipeline_inventory_vaults.csv";
const SCRIPTS_CSV: &str = "pipeline_inventory_scripts.csv";
const DOCKER_CSV: &str = "pipeline_inventory_docker.csv";
const HYGIENE_CSV: &str = "pipeline_inventory_harness.csv";

/// Per-stage and per-Jenkinsfile CI tool usage across every Jenkinsfile in
/// the tree, written as two CSVs: one row per stage, and one rolled-up row
/// per file.
///
/// Only git repositories are scanned; both reports carry one column per
/// tool keyword in addition to the fixed columns.
pub fn handle_inventory_tools(
    root: &Path,
    output: &Path,
    keywords_file: Option<&Path>,
) -> Result<()> {
    let custom;
    let keywords: &ToolKeywords = match keywords_file {
        Some(path) => {
            custom = ToolKeywords::from_yaml_file(path)?;
            &custom
        }
        None => ToolKeywords::builtin(),
    };

    let repos: Vec<RepoEntry> = team_repos(root)?
        .into_iter()
        .filter(|entry| is_git_repo(&entry.path))
        .collect();

    let per_repo: Vec<(Vec<Vec<String>>, Vec<Vec<String>>)> = repos
        .par_iter()
        .map(|entry| scan_repo_tools(entry, keywords))
        .collect();
    let mut stage_rows = Vec::new();
    let mut summary_rows = Vec::new();
    for (stages, summaries) in per_repo {
        stage_rows.extend(stages);
        summary_rows.extend(summaries);
    }

    let mut report = CsvReport::new(tool_headers(
        &["Stage Name", "Step Count"],
        keywords,
    ));
    report.extend_rows(stage_rows);
    let stage_path = report.write_to(output, TOOLS_CSV)?;

    let mut summary = CsvReport::new(tool_headers(&["Total Step Count"], keywords));
    summary.extend_rows(summary_rows);
    let summary_path = summary.write_to(output, TOOLS_SUMMARY_CSV)?;

    println!(
        "✅ Pipeline reports saved to {} and {}",
        stage_path.display(),
        summary_path.display()
    );
    Ok(())
}

/// Fixed columns, the report-specific count columns, then one column per
/// tool keyword.
fn tool_headers(count_columns: &[&str], keywords: &ToolKeywords) -> Vec<String> {
    let mut headers: Vec<String> = ["Team Folder", "Repo Name", "Jenkinsfile Name"]
        .map(String::from)
        .to_vec();
    headers.extend(count_columns.iter().map(|s| s.to_string()));
    headers.extend(["Full Path".to_string(), "Tools Used".to_string()]);
    headers.extend(keywords.names().iter().cloned());
    headers
}

fn scan_repo_tools(
    entry: &RepoEntry,
    keywords: &ToolKeywords,
) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    let mut stage_rows = Vec::new();
    let mut summary_rows = Vec::new();

    for jenkinsfile in find_files(&entry.path, &JENKINSFILE_PATTERN) {
        let content = match read_text_lossy(&jenkinsfile) {
            Ok(content) => content,
            Err(err) => {
                log::error!("skipping {}: {}", jenkinsfile.display(), err);
                continue;
            }
        };
        let file_name = file_name_of(&jenkinsfile);
        let full_path = format!("{}/{}", entry.repo, file_name);

        let records = extract_stages(&content, keywords);
        for record in &records {
            let mut row = vec![
                entry.team.clone(),
                entry.repo.clone(),
                file_name.clone(),
                record.name.clone(),
                record.step_count.to_string(),
                full_path.clone(),
                joined(&record.tools_used),
            ];
            for name in keywords.names() {
                row.push(record.per_tool_count[name].to_string());
            }
            stage_rows.push(row);
        }

        // One rolled-up row per file, even when it declares no stages.
        let file_summary = summarize(&records);
        let mut row = vec![
            entry.team.clone(),
            entry.repo.clone(),
            file_name,
            file_summary.step_count.to_string(),
            full_path,
            joined(&file_summary.tools_used),
        ];
        for name in keywords.names() {
            let count = file_summary.per_tool_count.get(name).copied().unwrap_or(0);
            row.push(count.to_string());
        }
        summary_rows.push(row);
    }

    (stage_rows, summary_rows)
}

fn joined(tools: &std::collections::BTreeSet<String>) -> String {
    tools.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Vault usage per function scope across every Jenkinsfile in the tree.
pub fn handle_inventory_vaults(root: &Path, output: &Path) -> Result<()> {
    let repos = team_repos(root)?;

    let rows: Vec<Vec<String>> = repos
        .par_iter()
        .flat_map_iter(scan_repo_vaults)
        .collect();

    let mut report = CsvReport::new([
        "Team",
        "Repo",
        "Jenkinsfile",
        "Function",
        "Vault URLs",
        "Vault Credentials",
        "Vault Namespaces",
        "KV Paths",
        "Vault Keys",
        "Vault Env Vars",
    ]);
    report.extend_rows(rows);
    let path = report.write_to(output, VAULTS_CSV)?;
    println!("✅ Vault usage report saved to {}", path.display());
    Ok(())
}

fn scan_repo_vaults(entry: &RepoEntry) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    for jenkinsfile in find_files(&entry.path, &JENKINSFILE_PATTERN) {
        let content = match read_text_lossy(&jenkinsfile) {
            Ok(content) => content,
            Err(err) => {
                log::error!("skipping {}: {}", jenkinsfile.display(), err);
                continue;
            }
        };
        let file_name = file_name_of(&jenkinsfile);

        for record in extract_vault_usage(&content) {
            rows.push(vec![
                entry.team.clone(),
                entry.repo.clone(),
                file_name.clone(),
                record.scope.clone(),
                record.urls.join(", "),
                record.credentials.join(", "),
                record.namespaces.join(", "),
                record.kv_paths.join(", "),
                record.keys.join(", "),
                record.env_vars.join(", "),
            ]);
        }
    }

    rows
}

/// Docker agent images, resolved image variables, nexus markers, and shell
/// scripts per pipeline stage. Only git repositories are scanned.
pub fn handle_inventory_scripts(root: &Path, output: &Path) -> Result<()> {
    let repos: Vec<RepoEntry> = team_repos(root)?
        .into_iter()
        .filter(|entry| is_git_repo(&entry.path))
        .collect();

    let rows: Vec<Vec<String>> = repos
        .par_iter()
        .flat_map_iter(scan_repo_scripts)
        .collect();

    let mut report = CsvReport::new([
        "Team",
        "Repo",
        "Jenkinsfile",
        "Stage",
        "Agent Image",
        "Agent Image Variable Value",
        "Nexus Info",
        "Shell Scripts",
    ]);
    report.extend_rows(rows);
    let path = report.write_to(output, SCRIPTS_CSV)?;
    println!("✅ Script inventory saved to {}", path.display());
    Ok(())
}

fn scan_repo_scripts(entry: &RepoEntry) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    for jenkinsfile in find_files(&entry.path, &JENKINSFILE_PATTERN) {
        let content = match read_text_lossy(&jenkinsfile) {
            Ok(content) => content,
            Err(err) => {
                log::error!("skipping {}: {}", jenkinsfile.display(), err);
                continue;
            }
        };
        let file_name = file_name_of(&jenkinsfile);

        for record in extract_docker_agents(&content) {
            rows.push(vec![
                entry.team.clone(),
                entry.repo.clone(),
                file_name.clone(),
                record.stage,
                record.image,
                record.image_var_value,
                record.nexus,
                record.scripts,
            ]);
        }
    }

    rows
}

/// Dockerfile and docker-compose base images per repository. Only git
/// repositories are scanned.
pub fn handle_inventory_docker(root: &Path, output: &Path) -> Result<()> {
    let repos: Vec<RepoEntry> = team_repos(root)?
        .into_iter()
        .filter(|entry| is_git_repo(&entry.path))
        .collect();

    let rows: Vec<Vec<String>> = repos
        .par_iter()
        .flat_map_iter(|entry| {
            docker_inventory(&entry.path, root, &entry.team, &entry.repo)
                .into_iter()
                .map(|record| {
                    vec![
                        record.team,
                        record.repo,
                        record.dockerfile_path,
                        record.dockerfile_name,
                        record.dockerfile_from,
                        record.compose_path,
                        record.compose_name,
                        record.compose_from,
                    ]
                })
        })
        .collect();

    let mut report = CsvReport::new([
        "Team Folder",
        "Repo Name",
        "Dockerfile Path",
        "Dockerfile Name",
        "Dockerfile FROM",
        "Compose File Path",
        "Compose File Name",
        "Compose FROM",
    ]);
    report.extend_rows(rows);
    let path = report.write_to(output, DOCKER_CSV)?;
    println!("✅ Docker inventory saved to {}", path.display());
    Ok(())
}

/// Presence of governance files and directories per repository.
pub fn handle_inventory_hygiene(root: &Path, output: &Path) -> Result<()> {
    let repos = team_repos(root)?;

    let rows: Vec<Vec<String>> = repos
        .par_iter()
        .flat_map_iter(|entry| {
            inspect_repo(&entry.path, root, &entry.team, &entry.repo)
                .into_iter()
                .map(|record| {
                    vec![
                        record.team,
                        record.repo,
                        record.kind.to_string(),
                        record.label,
                        if record.exists { "YES" } else { "NO" }.to_string(),
                        record.path,
                    ]
                })
        })
        .collect();

    let mut report = CsvReport::new([
        "Team Folder",
        "Repo Name",
        "Type",
        "Label",
        "Exists",
        "Path",
    ]);
    report.extend_rows(rows);
    let path = report.write_to(output, HYGIENE_CSV)?;
    println!("✅ Hygiene report saved to {}", path.display());
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
