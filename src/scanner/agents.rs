//! Docker agent and shell-script extraction from Jenkins pipeline stages.
//!
//! Each stage body is scanned for a `agent { docker { image ... } }`
//! declaration; when the image is given through a `${VAR}` reference the
//! assignment is resolved from the rest of the file. Nexus build markers
//! and inline shell scripts (`sh` steps and `script { ... }` blocks) are
//! collected per stage as well.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::scanner::block::extract_block;
use crate::scanner::stages::STAGE_RE;

static AGENT_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"agent\s*\{\s*docker\s*\{\s*image\s+['"]?([A-Za-z0-9_/.:${}-]+)"#).unwrap()
});
static IMAGE_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{?([A-Za-z0-9_]+(?:[.+-][A-Za-z0-9_]+)*)\}?").unwrap());
static ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z0-9_]+)\s*[:=]\s*['"]?([^\s'"]+)"#).unwrap());
static NEXUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)nexus\s*:\s*['"]?dockerfile['"]?\s*:\s*['"]?tag['"]?"#).unwrap()
});
static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)script\s*\{(.*?)\}").unwrap());
static SH_STEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)sh(?:\s+script:)?\s*(?:'''(.*?)'''|"""(.*?)"""|'([^']*)'|"([^"]*)")"#)
        .unwrap()
});

/// Separator between shell fragments in one stage's joined script text.
const SCRIPT_SEPARATOR: &str = "\n---\n";

/// Docker agent and script details of one pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentRecord {
    pub stage: String,
    /// Image expression as written, e.g. `${BUILD_IMAGE}` or `alpine:3.19`.
    pub image: String,
    /// Resolved value when the image is a variable reference and an
    /// assignment for it exists anywhere in the file, else empty.
    pub image_var_value: String,
    /// The `nexus: dockerfile: tag` marker text when present.
    pub nexus: String,
    /// All `sh` steps and `script { }` bodies, in order of appearance,
    /// joined with `---` separator lines.
    pub scripts: String,
}

/// Extract one record per `stage("<name>") { ... }` block, in file order.
pub fn extract_docker_agents(content: &str) -> Vec<AgentRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = STAGE_RE.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let stage = caps[1].to_string();
        let (block, next) = extract_block(&lines, i);
        let body = block.text(&lines);

        let image = AGENT_IMAGE_RE
            .captures(&body)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default();

        records.push(AgentRecord {
            stage,
            image_var_value: resolve_image_variable(&image, content),
            nexus: NEXUS_RE
                .find(&body)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            scripts: collect_scripts(&body),
            image,
        });
        i = next;
    }

    records
}

/// When `image` starts with a `$VAR` or `${VAR}` reference, look up the
/// first `VAR = value` or `VAR: value` assignment anywhere in the file.
fn resolve_image_variable(image: &str, content: &str) -> String {
    let Some(caps) = IMAGE_VAR_RE.captures(image) else {
        return String::new();
    };
    let var = &caps[1];
    ASSIGN_RE
        .captures_iter(content)
        .find(|caps| &caps[1] == var)
        .map(|caps| caps[2].to_string())
        .unwrap_or_default()
}

/// Gather `sh` step payloads and `script { }` bodies in order of
/// appearance within the stage body.
fn collect_scripts(body: &str) -> String {
    let mut fragments: Vec<(usize, String)> = Vec::new();

    for caps in SCRIPT_BLOCK_RE.captures_iter(body) {
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            let inner = inner.as_str().trim();
            if !inner.is_empty() {
                fragments.push((whole.start(), inner.to_string()));
            }
        }
    }
    for caps in SH_STEP_RE.captures_iter(body) {
        let payload = (1..=4)
            .filter_map(|g| caps.get(g))
            .map(|m| m.as_str().trim())
            .find(|s| !s.is_empty());
        if let (Some(whole), Some(payload)) = (caps.get(0), payload) {
            fragments.push((whole.start(), payload.to_string()));
        }
    }

    fragments.sort_by_key(|(start, _)| *start);
    fragments
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(SCRIPT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIPELINE: &str = r#"pipeline {
  environment {
    BUILD_IMAGE = "nexus.example.com/build/java:17"
  }
  stages {
    stage("Build") {
      agent {
        docker {
          image "${BUILD_IMAGE}"
        }
      }
      steps {
        sh "gradle assemble"
        script {
          echo "packaging"
        }
      }
    }
    stage("Scan") {
      steps {
        sh '''
          sonar-scanner
        '''
      }
    }
  }
}
"#;

    #[test]
    fn test_image_and_variable_resolution() {
        let records = extract_docker_agents(PIPELINE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stage, "Build");
        assert_eq!(records[0].image, "${BUILD_IMAGE}");
        assert_eq!(records[0].image_var_value, "nexus.example.com/build/java:17");
    }

    #[test]
    fn test_literal_image_has_no_variable_value() {
        let content = r#"stage("Test") {
  agent { docker { image "alpine:3.19" } }
}
"#;
        let records = extract_docker_agents(content);
        assert_eq!(records[0].image, "alpine:3.19");
        assert_eq!(records[0].image_var_value, "");
    }

    #[test]
    fn test_stage_without_agent() {
        let records = extract_docker_agents(PIPELINE);
        assert_eq!(records[1].stage, "Scan");
        assert_eq!(records[1].image, "");
        assert_eq!(records[1].image_var_value, "");
    }

    #[test]
    fn test_scripts_collected_in_order() {
        let records = extract_docker_agents(PIPELINE);
        let parts: Vec<&str> = records[0].scripts.split("\n---\n").collect();
        assert_eq!(parts, vec!["gradle assemble", "echo \"packaging\""]);
    }

    #[test]
    fn test_triple_quoted_sh_step() {
        let records = extract_docker_agents(PIPELINE);
        assert_eq!(records[1].scripts, "sonar-scanner");
    }

    #[test]
    fn test_nexus_marker() {
        let content = r#"stage("Publish") {
  steps {
    publish nexus: 'dockerfile': 'tag'
  }
}
"#;
        let records = extract_docker_agents(content);
        assert_eq!(records[0].nexus, "nexus: 'dockerfile': 'tag'");
    }

    #[test]
    fn test_no_stages() {
        assert!(extract_docker_agents("FROM ubuntu\n").is_empty());
    }
}
