// src/notify/smtp.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{EmailPayload, MailSender};
use crate::config::SmtpSettings;

pub struct SmtpSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpSender {
    pub fn new(cfg: &SmtpSettings) -> Result<Self> {
        let creds = Credentials::new(cfg.user.clone(), cfg.pass.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
            .with_context(|| format!("invalid SMTP_HOST {}", cfg.host))?
            .credentials(creds)
            .build();
        Ok(Self { mailer })
    }
}

/// Build the HTML message; every address must parse as a mailbox.
pub fn build_message(email: &EmailPayload) -> Result<Message> {
    let from: Mailbox = email.from.parse().context("invalid sender address")?;
    let mut builder = Message::builder()
        .from(from)
        .subject(email.subject.clone())
        .header(header::ContentType::TEXT_HTML);
    for to in &email.to {
        let mb: Mailbox = to
            .parse()
            .with_context(|| format!("invalid recipient {to}"))?;
        builder = builder.to(mb);
    }
    builder.body(email.html.clone()).context("build email")
}

#[async_trait]
impl MailSender for SmtpSender {
    async fn send(&self, email: &EmailPayload) -> Result<()> {
        let msg = build_message(email)?;
        self.mailer.send(msg).await.context("send email")?;
        tracing::info!(target: "notify", to = ?email.to, "digest sent via smtp");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
