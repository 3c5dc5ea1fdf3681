pub mod file_utils;

pub use file_utils::{RepoEntry, find_files, is_git_repo, read_text_lossy, team_repos};
