// src/config/settings.rs
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

pub const ENV_FIRECRAWL_API_KEY: &str = "FIRECRAWL_API_KEY";
pub const ENV_REDDIT_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const ENV_REDDIT_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const ENV_RESEND_API_KEY: &str = "RESEND_API_KEY";
pub const ENV_DIGEST_EMAIL: &str = "DIGEST_EMAIL";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASS: &str = "SMTP_PASS";
pub const ENV_MANUS_API_KEY: &str = "MANUS_API_KEY";
pub const ENV_MANUS_SKILLS_DIR: &str = "MANUS_SKILLS_DIR";
pub const ENV_REPORTS_DIR: &str = "REPORTS_DIR";
pub const ENV_FETCH_BUDGET: &str = "FETCH_BUDGET";
pub const ENV_TARGETS_CONFIG_PATH: &str = "TARGETS_CONFIG_PATH";

pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_SKILLS_DIR: &str = "manus-skills";
/// Pages deep-scraped per collector run (free-tier credit limit).
pub const DEFAULT_FETCH_BUDGET: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub user: String,
    pub pass: String,
}

/// Everything read from the environment. Optional credentials stay `None`
/// when unset or blank; each surface decides whether its credential is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub firecrawl_api_key: Option<String>,
    pub reddit: Option<RedditCredentials>,
    pub resend_api_key: Option<String>,
    pub digest_email: Option<String>,
    pub smtp: Option<SmtpSettings>,
    pub manus_api_key: Option<String>,
    pub manus_skills_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub fetch_budget: usize,
    pub targets_config_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            firecrawl_api_key: None,
            reddit: None,
            resend_api_key: None,
            digest_email: None,
            smtp: None,
            manus_api_key: None,
            manus_skills_dir: PathBuf::from(DEFAULT_SKILLS_DIR),
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            fetch_budget: DEFAULT_FETCH_BUDGET,
            targets_config_path: None,
        }
    }
}

impl Settings {
    /// Read from the process environment (call `dotenvy::dotenv()` first to pick up `.env`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let reddit = match (get(ENV_REDDIT_CLIENT_ID), get(ENV_REDDIT_CLIENT_SECRET)) {
            (Some(client_id), Some(client_secret)) => Some(RedditCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let smtp = match (get(ENV_SMTP_HOST), get(ENV_SMTP_USER), get(ENV_SMTP_PASS)) {
            (Some(host), Some(user), Some(pass)) => Some(SmtpSettings { host, user, pass }),
            _ => None,
        };

        let fetch_budget = match get(ENV_FETCH_BUDGET) {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("{ENV_FETCH_BUDGET} must be a non-negative integer, got {v:?}"))?,
            None => DEFAULT_FETCH_BUDGET,
        };

        Ok(Self {
            firecrawl_api_key: get(ENV_FIRECRAWL_API_KEY),
            reddit,
            resend_api_key: get(ENV_RESEND_API_KEY),
            digest_email: get(ENV_DIGEST_EMAIL),
            smtp,
            manus_api_key: get(ENV_MANUS_API_KEY),
            manus_skills_dir: get(ENV_MANUS_SKILLS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SKILLS_DIR)),
            reports_dir: get(ENV_REPORTS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
            fetch_budget,
            targets_config_path: get(ENV_TARGETS_CONFIG_PATH).map(PathBuf::from),
        })
    }

    /// Required by the stories collector.
    pub fn reddit_credentials(&self) -> Result<&RedditCredentials> {
        self.reddit.as_ref().ok_or_else(|| {
            anyhow!("{ENV_REDDIT_CLIENT_ID} and {ENV_REDDIT_CLIENT_SECRET} must be set")
        })
    }

    pub fn manus_api_key(&self) -> Result<&str> {
        self.manus_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{ENV_MANUS_API_KEY} not set"))
    }

    pub fn digest_recipient(&self) -> Result<&str> {
        self.digest_email
            .as_deref()
            .ok_or_else(|| anyhow!("{ENV_DIGEST_EMAIL} not set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s, Settings::default());
        assert!(s.reddit_credentials().is_err());
        assert!(s.manus_api_key().is_err());
    }

    #[test]
    fn blank_values_are_unset_and_pairs_must_be_complete() {
        let s = Settings::from_lookup(lookup(&[
            (ENV_FIRECRAWL_API_KEY, "  "),
            (ENV_REDDIT_CLIENT_ID, "id"),
            (ENV_SMTP_HOST, "smtp.example.org"),
            (ENV_SMTP_USER, "u"),
            (ENV_SMTP_PASS, "p"),
            (ENV_FETCH_BUDGET, "5"),
        ]))
        .unwrap();
        assert!(s.firecrawl_api_key.is_none());
        assert!(s.reddit.is_none());
        assert_eq!(s.smtp.as_ref().map(|m| m.host.as_str()), Some("smtp.example.org"));
        assert_eq!(s.fetch_budget, 5);
    }

    #[test]
    fn bad_budget_is_an_error() {
        assert!(Settings::from_lookup(lookup(&[(ENV_FETCH_BUDGET, "three")])).is_err());
    }
}
