// src/agent/manus.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::TaskApi;

const BASE_URL: &str = "https://api.manus.im/v1";

pub struct ManusClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct CreateTask<'a> {
    prompt: &'a str,
    name: &'a str,
}

impl ManusClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Task id from a create response: `task_id`, else `id` (string or number).
pub fn task_id_from(doc: &Value) -> Option<String> {
    ["task_id", "id"]
        .iter()
        .filter_map(|k| doc.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[async_trait]
impl TaskApi for ManusClient {
    async fn create_task(&self, prompt: &str, name: &str) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/tasks", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&CreateTask { prompt, name })
            .send()
            .await
            .context("creating agent task")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("agent task creation failed: {status}: {body}"));
        }
        let doc: Value = resp.json().await.context("agent task response")?;
        task_id_from(&doc).ok_or_else(|| anyhow!("agent task response carried no task id"))
    }

    async fn task_status(&self, task_id: &str) -> Result<Value> {
        self.client
            .get(format!("{}/tasks/{}", self.base_url, task_id))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .context("polling agent task")?
            .error_for_status()
            .context("agent task status")?
            .json()
            .await
            .context("agent task status body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_id_prefers_task_id_field() {
        assert_eq!(task_id_from(&json!({"task_id": "t1", "id": "x"})).as_deref(), Some("t1"));
        assert_eq!(task_id_from(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(task_id_from(&json!({"task_id": ""})), None);
    }

    #[tokio::test]
    async fn create_task_surfaces_connection_errors() {
        let api = ManusClient::new("key".into(), reqwest::Client::new())
            .with_base_url("http://127.0.0.1:9/v1");
        let err = api.create_task("prompt", "name").await.unwrap_err();
        assert!(err.to_string().contains("creating agent task"));
    }
}
