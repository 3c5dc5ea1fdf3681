//! Vault usage extraction from Jenkins pipeline text.
//!
//! Function-like blocks (`def name(...) { ... }`) are taken with the shared
//! brace-balance extractor; each body is then scanned with independent,
//! non-exclusive regex extractions for Vault URLs, credential identifiers,
//! namespaces, kv paths, quoted keys, and Vault-related environment
//! variables. A top-level `environment { ... }` block contributes a
//! sentinel record for its own Vault variables.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::scanner::block::extract_block;

/// Scope name used for variables found in the top-level environment block.
pub const GLOBAL_SCOPE: &str = "global_environment";

static FUNC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdef\s+(\w+)\s*\(").unwrap());
static ENV_HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\benvironment\s*\{").unwrap());

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:https?://)?[a-zA-Z0-9.-]+\.vault\.?[a-zA-Z0-9.-]*/?[a-zA-Z0-9._~:/?#\[\]@!$&'()*+,;=%]*"#,
    )
    .unwrap()
});
static CRED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)vault.*?(?:cred|token|secret)[^\s"'=]*"#).unwrap());
static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)namespace\s*=\s*['"]([^'"]+)['"]"#).unwrap());
static KV_PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)kv/([A-Za-z0-9_\-/]+)").unwrap());
static QUOTED_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([A-Za-z0-9_\-]+)['"]"#).unwrap());
static ENV_ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z0-9_]+)\s*=\s*['"]([^'"]+)['"]"#).unwrap());

/// Vault-related patterns found in one scope.
///
/// Extractions are independent; a record may carry any combination of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    /// Enclosing function name, or [`GLOBAL_SCOPE`].
    pub scope: String,
    pub urls: Vec<String>,
    pub credentials: Vec<String>,
    pub namespaces: Vec<String>,
    pub kv_paths: Vec<String>,
    /// Quoted key names, deduplicated and sorted; only collected when the
    /// scope references at least one kv path.
    pub keys: Vec<String>,
    /// `NAME=value` pairs whose variable name contains "vault".
    pub env_vars: Vec<String>,
}

impl UsageRecord {
    pub fn has_vault_usage(&self) -> bool {
        !self.urls.is_empty()
            || !self.credentials.is_empty()
            || !self.namespaces.is_empty()
            || !self.kv_paths.is_empty()
            || !self.env_vars.is_empty()
    }
}

/// Extract one record per function-like block, plus a global record when the
/// top-level environment block declares Vault variables.
pub fn extract_vault_usage(content: &str) -> Vec<UsageRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = FUNC_RE.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let name = caps[1].to_string();
        let (block, next) = extract_block(&lines, i);
        records.push(scan_scope(name, &block.text(&lines)));
        i = next;
    }

    if let Some(env_vars) = global_environment_vars(&lines) {
        if !env_vars.is_empty() {
            records.push(UsageRecord {
                scope: GLOBAL_SCOPE.to_string(),
                env_vars,
                ..UsageRecord::default()
            });
        }
    }

    records
}

fn scan_scope(scope: String, body: &str) -> UsageRecord {
    let urls = capture_all(&URL_RE, body, 0);
    let credentials = capture_all(&CRED_RE, body, 0);
    let namespaces = capture_all(&NAMESPACE_RE, body, 1);
    let kv_paths = capture_all(&KV_PATH_RE, body, 1);

    // Key names are only meaningful next to a kv path reference.
    let keys = if kv_paths.is_empty() {
        Vec::new()
    } else {
        QUOTED_KEY_RE
            .captures_iter(body)
            .map(|caps| caps[1].to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };

    UsageRecord {
        scope,
        urls,
        credentials,
        namespaces,
        kv_paths,
        keys,
        env_vars: vault_env_vars(body),
    }
}

fn capture_all(re: &Regex, text: &str, group: usize) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(group).map(|m| m.as_str().to_string()))
        .collect()
}

fn vault_env_vars(text: &str) -> Vec<String> {
    ENV_ASSIGN_RE
        .captures_iter(text)
        .filter(|caps| caps[1].to_lowercase().contains("vault"))
        .map(|caps| format!("{}={}", &caps[1], &caps[2]))
        .collect()
}

/// Find the first top-level `environment { ... }` block and pull out its
/// Vault-related variable assignments.
fn global_environment_vars(lines: &[&str]) -> Option<Vec<String>> {
    let start = lines.iter().position(|line| ENV_HEADER_RE.is_match(line))?;
    let (block, _) = extract_block(lines, start);
    Some(vault_env_vars(&block.text(lines)))
}
