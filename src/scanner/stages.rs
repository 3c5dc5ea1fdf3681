//! Jenkins pipeline stage and tool-usage extraction.
//!
//! Stages are located by their `stage("<name>") {` header line, their bodies
//! taken with the same brace-balance discipline as the tag checker, and each
//! body is matched against a controlled vocabulary of CI tool keywords.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::scanner::block::extract_block;

pub(crate) static STAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"stage\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static STEPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsteps\s*\{").unwrap());

/// Built-in CI tool vocabulary, matched case-insensitively with word
/// boundaries against stage bodies.
const BUILTIN_TOOLS: &[&str] = &[
    "artillery",
    "ansible",
    "ansible-lint",
    "alembic",
    "aws",
    "aws-cli",
    "awscli",
    "curl",
    "cypress",
    "docker-compose",
    "docker build",
    "docker push",
    "flake8",
    "git",
    "gradle",
    "gradle build",
    "gradle publish",
    "gradle test",
    "gradle wrapper",
    "gradle assemble",
    "gradlew",
    "java",
    "junit",
    "kubernetes",
    "kubernetes apply",
    "kubernetes create",
    "kubernetes delete",
    "jq",
    "make install",
    "make generate",
    "molecule",
    "newrelic",
    "nexus-iq",
    "nexus iq",
    "nexusiq",
    "node",
    "npm",
    "prisma-cloud",
    "prismacloudpublish",
    "python",
    "python3",
    "rvm.rake",
    "ruby",
    "rubocop",
    "snyk",
    "sonar",
    "sonar-scanner",
    "splunk",
    "tennable",
    "terraform apply",
    "terraform plan",
    "twistlock",
    "twistlock publish",
    "twistlock scan",
    "wget",
    "yarn",
];

static BUILTIN_KEYWORDS: Lazy<ToolKeywords> = Lazy::new(|| {
    ToolKeywords::new(BUILTIN_TOOLS.iter().map(|s| s.to_string()))
        .expect("built-in tool keywords must compile")
});

/// The immutable tool vocabulary: keyword names plus their compiled
/// word-boundary matchers. Constructed once per run and injected into the
/// extractor; never mutated afterwards.
#[derive(Debug)]
pub struct ToolKeywords {
    names: Vec<String>,
    matchers: Vec<Regex>,
}

impl ToolKeywords {
    pub fn new(names: impl IntoIterator<Item = String>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().collect();
        let matchers = names
            .iter()
            .map(|name| {
                Regex::new(&format!(r"\b{}\b", regex::escape(&name.to_lowercase())))
                    .map_err(ScanError::from)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { names, matchers })
    }

    /// The default vocabulary, compiled once.
    pub fn builtin() -> &'static ToolKeywords {
        &BUILTIN_KEYWORDS
    }

    /// Load the vocabulary from a YAML file containing a list of strings.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ScanError::KeywordList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let names: Vec<String> =
            serde_yaml::from_str(&raw).map_err(|e| ScanError::KeywordList {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Count word-boundary occurrences of every keyword in `text`.
    /// `text` is expected to already be lower-cased.
    fn count_in(&self, text: &str) -> Vec<usize> {
        self.matchers
            .iter()
            .map(|re| re.find_iter(text).count())
            .collect()
    }
}

/// Tool usage of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub name: String,
    /// Number of nested `steps {` openers inside the stage body.
    pub step_count: usize,
    pub tools_used: BTreeSet<String>,
    pub per_tool_count: BTreeMap<String, usize>,
}

/// Per-file aggregation across all stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub stage_count: usize,
    pub step_count: usize,
    pub tools_used: BTreeSet<String>,
    pub per_tool_count: BTreeMap<String, usize>,
}

/// Extract every `stage("<name>") { ... }` block with its step count and
/// tool usage. Stages come back in file order.
pub fn extract_stages(content: &str, keywords: &ToolKeywords) -> Vec<StageRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = STAGE_RE.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let name = caps[1].to_string();
        let (block, next) = extract_block(&lines, i);
        let body = block.text(&lines);
        let body_lower = body.to_lowercase();

        let counts = keywords.count_in(&body_lower);
        let per_tool_count: BTreeMap<String, usize> = keywords
            .names()
            .iter()
            .zip(&counts)
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        let tools_used = per_tool_count
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, _)| name.clone())
            .collect();

        records.push(StageRecord {
            name,
            step_count: STEPS_RE.find_iter(&body).count(),
            tools_used,
            per_tool_count,
        });
        i = next;
    }

    records
}

/// Sum step and tool counts and union the used-tool sets across stages.
pub fn summarize(records: &[StageRecord]) -> FileSummary {
    let mut summary = FileSummary {
        stage_count: records.len(),
        ..FileSummary::default()
    };
    for record in records {
        summary.step_count += record.step_count;
        summary.tools_used.extend(record.tools_used.iter().cloned());
        for (tool, count) in &record.per_tool_count {
            *summary.per_tool_count.entry(tool.clone()).or_insert(0) += count;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_stage() {
        let content = r#"pipeline {
  stages {
    stage("Build") {
      steps {
        sh "terraform apply"
      }
    }
  }
}
"#;
        let records = extract_stages(content, ToolKeywords::builtin());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Build");
        assert_eq!(records[0].step_count, 1);
        assert!(records[0].tools_used.contains("terraform apply"));
        assert_eq!(records[0].per_tool_count["terraform apply"], 1);
        assert_eq!(records[0].per_tool_count["docker build"], 0);
    }

    #[test]
    fn test_multiple_stages_in_order() {
        let content = r#"
stage('Lint') {
  steps { sh 'flake8 src' }
}
stage('Deploy') {
  steps { sh 'docker build .' }
  steps { sh 'docker push registry/app' }
}
"#;
        let records = extract_stages(content, ToolKeywords::builtin());
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Lint", "Deploy"]);
        assert_eq!(records[1].step_count, 2);
        assert!(records[1].tools_used.contains("docker build"));
        assert!(records[1].tools_used.contains("docker push"));
    }

    #[test]
    fn test_tool_matching_is_case_insensitive_with_word_boundaries() {
        let content = r#"stage("Test") {
  steps {
    sh "GRADLE build"
    sh "mygradle run"
  }
}
"#;
        let records = extract_stages(content, ToolKeywords::builtin());
        // "mygradle" must not count; "GRADLE" must.
        assert_eq!(records[0].per_tool_count["gradle"], 1);
    }

    #[test]
    fn test_tool_scan_is_scoped_to_the_stage_block() {
        let content = r#"stage("One") {
  steps { sh "npm ci" }
}
sh "yarn install"
"#;
        let records = extract_stages(content, ToolKeywords::builtin());
        assert_eq!(records.len(), 1);
        assert!(records[0].tools_used.contains("npm"));
        assert!(!records[0].tools_used.contains("yarn"));
    }

    #[test]
    fn test_summarize_aggregates() {
        let content = r#"stage("A") {
  steps { sh "npm test" }
}
stage("B") {
  steps { sh "npm publish" }
  steps { sh "sonar-scanner" }
}
"#;
        let records = extract_stages(content, ToolKeywords::builtin());
        let summary = summarize(&records);
        assert_eq!(summary.stage_count, 2);
        assert_eq!(summary.step_count, 3);
        assert_eq!(summary.per_tool_count["npm"], 2);
        assert!(summary.tools_used.contains("sonar-scanner"));
    }

    #[test]
    fn test_custom_keyword_set() {
        let keywords = ToolKeywords::new(vec!["helm".to_string()]).unwrap();
        let content = "stage(\"Ship\") {\n  steps { sh \"helm upgrade\" }\n}\n";
        let records = extract_stages(content, &keywords);
        assert_eq!(records[0].tools_used.len(), 1);
        assert!(records[0].tools_used.contains("helm"));
    }

    #[test]
    fn test_keyword_list_parses_from_yaml() {
        let names: Vec<String> = serde_yaml::from_str("- helm\n- kustomize\n").unwrap();
        let keywords = ToolKeywords::new(names).unwrap();
        assert_eq!(keywords.names(), ["helm", "kustomize"]);
    }

    #[test]
    fn test_no_stages() {
        assert!(extract_stages("FROM ubuntu\n", ToolKeywords::builtin()).is_empty());
    }
}
