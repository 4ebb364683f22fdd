// src/notify/resend.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{EmailPayload, MailSender};

const API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone)]
pub struct ResendSender {
    api_key: String,
    client: Client,
    endpoint: String,
    timeout: Duration,
    max_retries: u8,
}

impl ResendSender {
    pub fn new(api_key: String, client: Client) -> Self {
        Self {
            api_key,
            client,
            endpoint: API_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }
}

#[async_trait]
impl MailSender for ResendSender {
    async fn send(&self, email: &EmailPayload) -> Result<()> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .timeout(self.timeout)
                .json(email)
                .send()
                .await;

            let retry = match res {
                Ok(rsp) if rsp.status().is_success() => {
                    tracing::info!(target: "notify", to = ?email.to, "digest sent via resend");
                    return Ok(());
                }
                // Client errors will not improve on retry.
                Ok(rsp) if rsp.status().is_client_error() => {
                    let status = rsp.status();
                    let body = rsp.text().await.unwrap_or_default();
                    return Err(anyhow!("resend rejected email: {status}: {body}"));
                }
                Ok(rsp) => anyhow!("resend HTTP error: {}", rsp.status()),
                Err(e) => anyhow!("resend request failed: {e}"),
            };

            if attempt >= self.max_retries {
                return Err(retry);
            }
            tracing::warn!(target: "notify", error = %retry, attempt, "retrying digest send");
            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
        }
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}
