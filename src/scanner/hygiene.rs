//! Governance-file inventory for a single repository.
//!
//! Each repo is checked against a fixed list of required files and
//! directories (CI config, editor config, CODEOWNERS and friends); one
//! record is produced per target whether it exists or not.

use std::path::Path;

use serde::Serialize;

/// A required file or directory, relative to the repository root.
#[derive(Debug, Clone, Copy)]
pub struct InventoryTarget {
    pub rel_path: &'static str,
    pub label: &'static str,
    pub is_dir: bool,
}

#[rustfmt::skip]
pub const INVENTORY_TARGETS: &[InventoryTarget] = &[
    InventoryTarget { rel_path: ".harness", label: ".harness", is_dir: true },
    InventoryTarget { rel_path: ".github", label: ".github", is_dir: true },
    InventoryTarget { rel_path: ".vscode", label: ".vscode", is_dir: true },
    InventoryTarget { rel_path: "terraform", label: "terraform", is_dir: true },
    InventoryTarget { rel_path: ".dockerignore", label: ".dockerignore", is_dir: false },
    InventoryTarget { rel_path: ".editorconfig", label: ".editorconfig", is_dir: false },
    InventoryTarget { rel_path: ".gitignore", label: ".gitignore", is_dir: false },
    InventoryTarget { rel_path: ".pre-commit-config.yaml", label: ".pre-commit-config.yaml", is_dir: false },
    InventoryTarget { rel_path: "README.md", label: "README.md", is_dir: false },
];

const CODEOWNERS_LABEL: &str = "CODEOWNERS";

/// Presence of one governance target in one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HygieneRecord {
    pub team: String,
    pub repo: String,
    /// "DIR" or "FILE".
    pub kind: &'static str,
    pub label: String,
    pub exists: bool,
    /// Path relative to the scan root when the target exists, else empty.
    pub path: String,
}

/// Inspect one repository directory against all inventory targets.
///
/// `root` is the scan root; reported paths are made relative to it.
pub fn inspect_repo(repo_path: &Path, root: &Path, team: &str, repo: &str) -> Vec<HygieneRecord> {
    let mut records = Vec::new();

    for target in INVENTORY_TARGETS {
        let candidate = repo_path.join(target.rel_path);
        let exists = if target.is_dir {
            candidate.is_dir()
        } else {
            candidate.is_file()
        };
        records.push(HygieneRecord {
            team: team.to_string(),
            repo: repo.to_string(),
            kind: if target.is_dir { "DIR" } else { "FILE" },
            label: target.label.to_string(),
            exists,
            path: relative_display(&candidate, root, exists),
        });
    }

    // CODEOWNERS lives under .github and is checked separately.
    let codeowners = repo_path.join(".github").join(CODEOWNERS_LABEL);
    let exists = codeowners.is_file();
    records.push(HygieneRecord {
        team: team.to_string(),
        repo: repo.to_string(),
        kind: "FILE",
        label: CODEOWNERS_LABEL.to_string(),
        exists,
        path: relative_display(&codeowners, root, exists),
    });

    records
}

fn relative_display(candidate: &Path, root: &Path, exists: bool) -> String {
    if !exists {
        return String::new();
    }
    candidate
        .strip_prefix(root)
        .unwrap_or(candidate)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_inspect_repo_reports_every_target() {
        let root = tempfile::tempdir().unwrap();
        let repo = root.path().join("team-a").join("service");
        fs::create_dir_all(repo.join(".github")).unwrap();
        fs::write(repo.join(".gitignore"), "target/\n").unwrap();
        fs::write(repo.join(".github").join("CODEOWNERS"), "* @team-a\n").unwrap();

        let records = inspect_repo(&repo, root.path(), "team-a", "service");
        // One record per target plus CODEOWNERS.
        assert_eq!(records.len(), INVENTORY_TARGETS.len() + 1);

        let by_label = |label: &str| records.iter().find(|r| r.label == label).unwrap();
        assert!(by_label(".github").exists);
        assert_eq!(by_label(".github").kind, "DIR");
        assert!(by_label(".gitignore").exists);
        assert!(by_label("CODEOWNERS").exists);
        assert!(!by_label(".harness").exists);
        assert_eq!(by_label(".harness").path, "");
    }

    #[test]
    fn test_paths_are_relative_to_scan_root() {
        let root = tempfile::tempdir().unwrap();
        let repo = root.path().join("team-b").join("api");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("README.md"), "# api\n").unwrap();

        let records = inspect_repo(&repo, root.path(), "team-b", "api");
        let readme = records.iter().find(|r| r.label == "README.md").unwrap();
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(readme.path, format!("team-b{sep}api{sep}README.md"));
    }

    #[test]
    fn test_file_expected_but_directory_found() {
        let root = tempfile::tempdir().unwrap();
        let repo = root.path().join("team-c").join("svc");
        fs::create_dir_all(repo.join(".gitignore")).unwrap();

        let records = inspect_repo(&repo, root.path(), "team-c", "svc");
        let gitignore = records.iter().find(|r| r.label == ".gitignore").unwrap();
        assert!(!gitignore.exists);
    }
}
