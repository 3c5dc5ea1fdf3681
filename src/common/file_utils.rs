//! File reading and team/repo tree iteration.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::{Result, ScanError};

/// Read a file as text, falling back to Latin-1 when it is not valid UTF-8.
///
/// Pipeline files in the wild occasionally carry stray high bytes; Latin-1
/// maps every byte to a char, so the fallback cannot fail and the scan can
/// proceed on a best-effort decode.
pub fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            log::warn!(
                "{}: not valid UTF-8, falling back to Latin-1",
                path.display()
            );
            Ok(err.into_bytes().iter().map(|&b| b as char).collect())
        }
    }
}

/// One repository directory under `root/<team>/<repo>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub team: String,
    pub repo: String,
    pub path: PathBuf,
}

/// Enumerate `root/<team>/<repo>` directories, sorted for deterministic
/// output. Non-directories at either level are skipped.
pub fn team_repos(root: &Path) -> Result<Vec<RepoEntry>> {
    if !root.is_dir() {
        return Err(ScanError::InvalidRoot(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    for team_dir in sorted_subdirs(root)? {
        let team = dir_name(&team_dir);
        for repo_dir in sorted_subdirs(&team_dir)? {
            entries.push(RepoEntry {
                team: team.clone(),
                repo: dir_name(&repo_dir),
                path: repo_dir,
            });
        }
    }
    Ok(entries)
}

/// Whether the directory is a git repository (`.git` present).
pub fn is_git_repo(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Recursively find files under `repo` whose file name matches `pattern`
/// (e.g. `Jenkinsfile*`), sorted by path.
pub fn find_files(repo: &Path, pattern: &Pattern) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(repo)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| pattern.matches(name))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    Ok(subdirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
