//! market-intel: CLI entrypoint.
//! Runs one collector (or all), sends the digest, or runs an agent skill.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use market_intel::agent::{self, ManusClient, PollPolicy, SKILLS};
use market_intel::collector::{competitors, grants, partners, stories, CollectorOutput};
use market_intel::config::{load_targets, Settings, Targets};
use market_intel::digest::{self, html};
use market_intel::fetch::{ContentFetcher, FirecrawlClient};
use market_intel::metrics::Metrics;
use market_intel::notify::{sender_from_settings, EmailPayload};
use market_intel::record::Category;
use market_intel::report::{self, ReportStore};
use market_intel::sources::grants_gov::GrantsGovClient;
use market_intel::sources::reddit::RedditClient;
use market_intel::sources::rss::HttpFeedReader;

const DEFAULT_LOG_FILTER: &str =
    "market_intel=info,collector=info,report=info,digest=info,notify=info,agent=info,config=info,sources=info,warn";

#[derive(Debug, Parser)]
#[command(name = "market-intel", version, about = "Market-intelligence collectors and digest")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    /// Write Prometheus text exposition here after the command finishes.
    #[arg(long, global = true, value_name = "FILE")]
    metrics_out: Option<PathBuf>,

    /// Override REPORTS_DIR.
    #[arg(long, global = true, value_name = "DIR")]
    reports_dir: Option<PathBuf>,

    /// Override FETCH_BUDGET (pages deep-scraped per collector).
    #[arg(long, global = true)]
    budget: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Competitor websites.
    Competitors,
    /// Grants.gov, philanthropy news and foundation pages.
    Grants,
    /// Partner news mentions.
    Partners,
    /// Digital-divide stories from Reddit.
    Stories,
    /// Every collector in turn.
    All,
    /// Compose and send the HTML digest from the latest reports.
    Digest {
        /// Write the HTML to a file instead of sending it.
        #[arg(long)]
        dry_run: bool,
        #[arg(long, default_value = "digest-preview.html", value_name = "FILE")]
        out: PathBuf,
    },
    /// Agent skills.
    Skill {
        #[command(subcommand)]
        action: SkillCommand,
    },
}

#[derive(Debug, Subcommand)]
enum SkillCommand {
    /// List available skills.
    List,
    /// Run a skill as an agent task.
    Run {
        id: String,
        /// Return right after the task is created.
        #[arg(long)]
        no_wait: bool,
    },
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn collect(
    category: Category,
    settings: &Settings,
    targets: &Targets,
    client: &reqwest::Client,
) -> Result<CollectorOutput> {
    let fetcher = settings
        .firecrawl_api_key
        .clone()
        .map(|key| FirecrawlClient::new(key, client.clone()));
    let fetcher = fetcher.as_ref().map(|f| f as &dyn ContentFetcher);
    let budget = settings.fetch_budget;

    let out = match category {
        Category::Competitors => competitors::collect(&targets.competitors, fetcher, budget).await,
        Category::Grants => {
            let search = GrantsGovClient::new(client.clone());
            let feeds = HttpFeedReader::new(client.clone());
            grants::collect(
                &targets.grant_keywords,
                &targets.foundations,
                &search,
                &feeds,
                fetcher,
                budget,
            )
            .await
        }
        Category::Partners => {
            let feeds = HttpFeedReader::new(client.clone());
            partners::collect(&targets.partners, &feeds).await
        }
        Category::Stories => {
            let creds = settings.reddit_credentials()?;
            let reddit =
                RedditClient::connect(client.clone(), &creds.client_id, &creds.client_secret)
                    .await?;
            stories::collect(&targets.subreddits, &targets.story_keywords, &reddit).await
        }
    };
    Ok(out)
}

async fn run_collector(
    category: Category,
    settings: &Settings,
    targets: &Targets,
    client: &reqwest::Client,
) -> Result<()> {
    let out = collect(category, settings, targets, client)
        .await
        .with_context(|| format!("{category} collector"))?;
    let store = ReportStore::new(&settings.reports_dir);
    let path = report::publish(&store, category, out.records, today())?;
    println!(
        "{category}: fetched {}/{} targets, saved {}",
        out.summary.fetched,
        out.summary.total,
        path.display()
    );
    Ok(())
}

async fn run_all(settings: &Settings, targets: &Targets, client: &reqwest::Client) -> Result<()> {
    let mut failed = Vec::new();
    for category in Category::ALL {
        if let Err(e) = run_collector(category, settings, targets, client).await {
            tracing::error!(target: "collector", error = ?e, category = category.stem(), "collector aborted");
            failed.push(category.stem());
        }
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("collectors failed: {}", failed.join(", ")))
    }
}

/// One collector, or all of them when `only` is `None`.
async fn collectors(
    settings: &Settings,
    client: &reqwest::Client,
    only: Option<Category>,
) -> Result<()> {
    let targets = load_targets(settings.targets_config_path.as_deref())?;
    match only {
        Some(category) => run_collector(category, settings, &targets, client).await,
        None => run_all(settings, &targets, client).await,
    }
}

async fn run_digest(
    settings: &Settings,
    client: &reqwest::Client,
    dry_run: bool,
    out: PathBuf,
) -> Result<()> {
    let store = ReportStore::new(&settings.reports_dir);
    let date = today();
    let composed = digest::compose(&store, date);
    let body = html::render(&composed);

    if dry_run {
        std::fs::write(&out, &body).with_context(|| format!("writing {}", out.display()))?;
        println!(
            "digest preview ({} sections) written to {}",
            composed.sections.len(),
            out.display()
        );
        return Ok(());
    }

    let to = settings.digest_recipient()?;
    let sender = sender_from_settings(settings, client.clone())?;
    let email = EmailPayload::digest(to, date, body);
    sender.send(&email).await?;
    println!("digest sent to {to} via {}", sender.name());
    Ok(())
}

async fn run_skill_command(
    action: SkillCommand,
    settings: &Settings,
    client: &reqwest::Client,
) -> Result<()> {
    match action {
        SkillCommand::List => {
            for s in SKILLS {
                println!("{:<18} {}", s.id, s.description);
            }
            Ok(())
        }
        SkillCommand::Run { id, no_wait } => {
            let api = ManusClient::new(settings.manus_api_key()?.to_string(), client.clone());
            let run = agent::run_skill(
                &api,
                &settings.manus_skills_dir,
                &id,
                !no_wait,
                PollPolicy::default(),
                today(),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&run)?);
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env when present; real env vars win.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.json);

    let mut settings = Settings::from_env()?;
    if let Some(dir) = cli.reports_dir {
        settings.reports_dir = dir;
    }
    if let Some(b) = cli.budget {
        settings.fetch_budget = b;
    }

    let metrics = match cli.metrics_out.as_ref() {
        Some(_) => Some(Metrics::init()?),
        None => None,
    };

    let client = market_intel::http_client()?;
    let result = match cli.command {
        Command::Competitors => collectors(&settings, &client, Some(Category::Competitors)).await,
        Command::Grants => collectors(&settings, &client, Some(Category::Grants)).await,
        Command::Partners => collectors(&settings, &client, Some(Category::Partners)).await,
        Command::Stories => collectors(&settings, &client, Some(Category::Stories)).await,
        Command::All => collectors(&settings, &client, None).await,
        Command::Digest { dry_run, out } => run_digest(&settings, &client, dry_run, out).await,
        Command::Skill { action } => run_skill_command(action, &settings, &client).await,
    };

    if let (Some(m), Some(path)) = (metrics.as_ref(), cli.metrics_out.as_ref()) {
        if let Err(e) = m.write_to(path) {
            tracing::warn!(error = ?e, "metrics dump failed");
        }
    }

    result
}
