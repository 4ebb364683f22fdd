// src/agent/mod.rs
//! Agent skills: canned research prompts stored as markdown files and run as
//! tasks on a hosted agent API.

pub mod manus;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

pub use manus::ManusClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub id: &'static str,
    pub file: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const SKILLS: &[Skill] = &[
    Skill {
        id: "lead-researcher",
        file: "hti-lead-researcher.md",
        name: "HTI Lead Researcher",
        description: "Find potential donors and corporate sponsors",
    },
    Skill {
        id: "grant-scanner",
        file: "hti-grant-scanner.md",
        name: "HTI Grant Scanner",
        description: "Search for matching grant opportunities",
    },
    Skill {
        id: "equipment-pricer",
        file: "hti-equipment-pricer.md",
        name: "HTI Equipment Pricer",
        description: "Market analysis for device pricing",
    },
];

pub fn find_skill(id: &str) -> Result<&'static Skill> {
    SKILLS.iter().find(|s| s.id == id).ok_or_else(|| {
        let known: Vec<&str> = SKILLS.iter().map(|s| s.id).collect();
        anyhow!("unknown skill: {id}. Available: {}", known.join(", "))
    })
}

/// Body of the first fenced block after the `### Task Prompt` heading.
/// Falls back to the whole document when there is no such block.
pub fn extract_prompt(markdown: &str) -> String {
    let mut lines = markdown.lines();
    let found_heading = lines.by_ref().any(|l| l.contains("### Task Prompt"));
    if found_heading && lines.by_ref().any(|l| l.trim_start().starts_with("```")) {
        let body: Vec<&str> = lines.take_while(|l| !l.contains("```")).collect();
        if !body.is_empty() {
            return body.join("\n");
        }
    }
    markdown.to_string()
}

pub fn load_prompt(skills_dir: &Path, skill: &Skill) -> Result<String> {
    let path = skills_dir.join(skill.file);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading skill file {}", path.display()))?;
    Ok(extract_prompt(&content))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    /// Created; not waited on.
    Submitted,
    Completed {
        outputs: Vec<Value>,
        result: Option<Value>,
    },
    Failed {
        error: Option<Value>,
    },
    Timeout,
}

/// Map a task status document to a final outcome; `None` while still running.
pub fn outcome_from_status(doc: &Value) -> Option<TaskOutcome> {
    let status = doc.get("status").and_then(Value::as_str).unwrap_or("unknown");
    match status {
        "completed" | "finished" | "done" => Some(TaskOutcome::Completed {
            outputs: doc
                .get("outputs")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            result: doc.get("result").filter(|v| !v.is_null()).cloned(),
        }),
        "failed" | "error" => Some(TaskOutcome::Failed {
            error: doc.get("error").filter(|v| !v.is_null()).cloned(),
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRun {
    pub task_id: String,
    pub skill: &'static str,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(600),
        }
    }
}

#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Create a task and return its id.
    async fn create_task(&self, prompt: &str, name: &str) -> Result<String>;
    /// Raw status document for a task.
    async fn task_status(&self, task_id: &str) -> Result<Value>;
}

/// Submit a skill's prompt as a task and optionally wait for it to finish.
pub async fn run_skill(
    api: &dyn TaskApi,
    skills_dir: &Path,
    skill_id: &str,
    wait: bool,
    poll: PollPolicy,
    today: NaiveDate,
) -> Result<SkillRun> {
    let skill = find_skill(skill_id)?;
    let prompt = load_prompt(skills_dir, skill)?;
    let name = format!("{} - {}", skill.name, today.format("%Y-%m-%d"));

    let task_id = api.create_task(&prompt, &name).await?;
    tracing::info!(target: "agent", skill = skill.id, task_id = %task_id, "task created");

    if !wait {
        return Ok(SkillRun {
            task_id,
            skill: skill.id,
            outcome: TaskOutcome::Submitted,
        });
    }

    let mut elapsed = Duration::ZERO;
    let outcome = loop {
        if elapsed >= poll.max_wait {
            break TaskOutcome::Timeout;
        }
        let doc = api.task_status(&task_id).await?;
        if let Some(done) = outcome_from_status(&doc) {
            break done;
        }
        tracing::debug!(target: "agent", task_id = %task_id, status = ?doc.get("status"), "task still running");
        tokio::time::sleep(poll.interval).await;
        elapsed += poll.interval;
    };

    tracing::info!(target: "agent", skill = skill.id, task_id = %task_id, outcome = ?outcome, "task finished");
    Ok(SkillRun {
        task_id,
        skill: skill.id,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_is_the_fenced_block_after_heading() {
        let md = "# Skill\n```\nnot this\n```\n### Task Prompt\nIntro text\n```text\nFind donors\nin NC\n```\nafter";
        assert_eq!(extract_prompt(md), "Find donors\nin NC");
    }

    #[test]
    fn prompt_falls_back_to_whole_file() {
        let md = "# Skill\nJust do the research.";
        assert_eq!(extract_prompt(md), md);
        let unterminated_heading = "### Task Prompt\nno fence here";
        assert_eq!(extract_prompt(unterminated_heading), unterminated_heading);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            outcome_from_status(&json!({"status": "done", "outputs": [1, 2]})),
            Some(TaskOutcome::Completed {
                outputs: vec![json!(1), json!(2)],
                result: None
            })
        );
        assert_eq!(
            outcome_from_status(&json!({"status": "error", "error": "boom"})),
            Some(TaskOutcome::Failed {
                error: Some(json!("boom"))
            })
        );
        assert_eq!(outcome_from_status(&json!({"status": "running"})), None);
        assert_eq!(outcome_from_status(&json!({})), None);
    }

    #[test]
    fn unknown_skill_lists_available() {
        let err = find_skill("nope").unwrap_err().to_string();
        assert!(err.contains("lead-researcher"));
    }
}
