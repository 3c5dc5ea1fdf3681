//! Dockerfile and docker-compose inventory for a single repository.
//!
//! Only the repository root is inspected (nested Dockerfiles belong to the
//! pipeline scan, not this inventory). Each Dockerfile yields one record;
//! a repo without any still yields a single record so its compose usage,
//! or the absence of both, is visible in the report.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::common::read_text_lossy;

// Base-image detection gives up past this point; FROM lines live at the top.
const FROM_SCAN_LIMIT: usize = 100;

/// Docker base-image usage of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockerRecord {
    pub team: String,
    pub repo: String,
    /// Directory of the Dockerfile relative to the scan root, empty when
    /// the repo has none.
    pub dockerfile_path: String,
    pub dockerfile_name: String,
    pub dockerfile_from: String,
    /// Path of the first docker-compose file relative to the scan root.
    pub compose_path: String,
    pub compose_name: String,
    pub compose_from: String,
}

/// Inventory the Dockerfiles and the first docker-compose file at the top
/// level of one repository directory.
pub fn docker_inventory(repo_path: &Path, root: &Path, team: &str, repo: &str) -> Vec<DockerRecord> {
    let dockerfiles = top_level_files(repo_path, |name| name.starts_with("Dockerfile"));
    let compose = top_level_files(repo_path, |name| {
        name.starts_with("docker-compose") && (name.ends_with(".yml") || name.ends_with(".yaml"))
    })
    .into_iter()
    .next();

    let (compose_path, compose_name, compose_from) = match &compose {
        Some(path) => (
            relative_display(path, root),
            file_name_of(path),
            first_from_line(path),
        ),
        None => Default::default(),
    };

    let base = DockerRecord {
        team: team.to_string(),
        repo: repo.to_string(),
        compose_path,
        compose_name,
        compose_from,
        ..DockerRecord::default()
    };

    if dockerfiles.is_empty() {
        return vec![base];
    }

    dockerfiles
        .iter()
        .map(|dockerfile| DockerRecord {
            dockerfile_path: dockerfile
                .parent()
                .map(|dir| relative_display(dir, root))
                .unwrap_or_default(),
            dockerfile_name: file_name_of(dockerfile),
            dockerfile_from: first_from_line(dockerfile),
            ..base.clone()
        })
        .collect()
}

/// The first `FROM <image>` line near the top of the file, or empty when
/// none is found or the file cannot be read.
fn first_from_line(path: &Path) -> String {
    let Ok(content) = read_text_lossy(path) else {
        return String::new();
    };
    content
        .lines()
        .take(FROM_SCAN_LIMIT)
        .map(str::trim)
        .find(|line| line.starts_with("FROM ") && line.split_whitespace().count() > 1)
        .map(str::to_string)
        .unwrap_or_default()
}

fn top_level_files(dir: &Path, matches: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        log::error!("cannot list {}", dir.display());
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(&matches)
        })
        .collect();
    files.sort();
    files
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
