// src/notify/mod.rs
//! Digest delivery. Resend's HTTP API is the primary transport; an SMTP relay
//! is used when only SMTP credentials are configured.

pub mod resend;
pub mod smtp;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;
use crate::digest;

pub const DIGEST_SENDER: &str = "HTI Intelligence <reports@resend.dev>";

/// Mail API payload: `{from, to[], subject, html}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl EmailPayload {
    pub fn digest(to: &str, date: NaiveDate, html: String) -> Self {
        Self {
            from: DIGEST_SENDER.to_string(),
            to: vec![to.to_string()],
            subject: digest::subject(date),
            html,
        }
    }
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &EmailPayload) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Pick the transport from configured credentials: Resend first, then SMTP.
pub fn sender_from_settings(
    settings: &Settings,
    client: reqwest::Client,
) -> Result<Box<dyn MailSender>> {
    if let Some(key) = settings.resend_api_key.as_deref() {
        return Ok(Box::new(resend::ResendSender::new(key.to_string(), client)));
    }
    if let Some(smtp) = settings.smtp.as_ref() {
        return Ok(Box::new(smtp::SmtpSender::new(smtp)?));
    }
    bail!("no mail transport configured: set RESEND_API_KEY or SMTP_HOST/SMTP_USER/SMTP_PASS")
}
