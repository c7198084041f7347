mod tui;

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use vectorweb_core::backend::{HttpSearchBackend, SearchBackend};
use vectorweb_core::config::VectorWebConfig;
use vectorweb_core::model::{
    ConnectivityStatus, ResultOrigin, ResultSet, SearchOutcome, SearchRequest,
};
use vectorweb_core::orchestrator::Orchestrator;
use vectorweb_core::probe;

const DEFAULT_LOG_FILTER: &str = "vectorweb=info";
const PREVIEW_WIDTH: usize = 80;

#[derive(Parser)]
#[command(
    name = "vectorweb",
    about = "VectorWeb: semantic search over any web page",
    version
)]
struct Cli {
    /// Search service base URL (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the content of a web page
    Search {
        /// Page to vectorize and search
        url: String,
        /// Natural-language query
        query: String,
        /// Maximum number of results (default from config, fallback 10)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether the search service is reachable
    Health {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive terminal UI
    Tui {
        /// Pre-filled page URL
        #[arg(long)]
        url: Option<String>,
        /// Pre-filled query
        #[arg(long)]
        query: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Command::Tui { .. }));

    let mut config = VectorWebConfig::load(Some(&std::env::current_dir()?)).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        VectorWebConfig::default_config()
    });
    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
        config.validate();
    }

    match cli.command {
        Command::Search {
            url,
            query,
            limit,
            json,
        } => cmd_search(&config, &url, &query, limit, json).await,
        Command::Health { json } => cmd_health(&config, json).await,
        Command::Tui { url, query } => tui::run_tui(&config, url, query).await,
        Command::Config => cmd_config(&config),
    }
}

/// One-shot commands log to stderr. The TUI owns the terminal, so it logs to
/// a file in the cache dir instead, or nowhere if that file can't be opened.
fn init_tracing(to_file: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if !to_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
        return;
    }

    let file = log_file_path().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

fn log_file_path() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("vectorweb");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("vectorweb.log"))
}

fn make_backend(config: &VectorWebConfig) -> Result<HttpSearchBackend> {
    HttpSearchBackend::from_config(&config.service).context("failed to create search client")
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

async fn cmd_search(
    config: &VectorWebConfig,
    url: &str,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(config.search.default_limit);
    let request = SearchRequest::new(url, query, limit).context("invalid search")?;

    let orchestrator = Orchestrator::from_config(make_backend(config)?, config);
    let status = probe::probe(orchestrator.backend()).await;
    let resolution = orchestrator.execute(&request, status).await;
    let status = resolution.status.unwrap_or(status);

    match resolution.outcome {
        SearchOutcome::Success(set) => {
            if json {
                let out = serde_json::json!({
                    "status": status,
                    "origin": set.origin,
                    "count": set.len(),
                    "results": set.items,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_results(&set, orchestrator.backend().endpoint());
            }
            Ok(())
        }
        SearchOutcome::Failure(message) => {
            if json {
                let out = serde_json::json!({ "status": status, "error": message });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                eprintln!("{} {}", "Search failed:".red().bold(), message);
            }
            std::process::exit(1);
        }
        SearchOutcome::Pending => anyhow::bail!("search did not resolve"),
    }
}

fn print_results(set: &ResultSet, endpoint: &str) {
    if set.origin == ResultOrigin::Preview {
        println!(
            "{} {}",
            " Preview Mode ".black().on_yellow(),
            format!("service at {endpoint} is not reachable, showing simulated results").yellow()
        );
        println!();
    }

    if set.is_empty() {
        println!("{}", "No matches found.".dimmed());
        return;
    }

    println!("{}", format!("{} Matches", set.len()).bold());
    println!(
        "{:<4} {:<7} {:<10} {}",
        "#".dimmed(),
        "Score".dimmed(),
        "ID".dimmed(),
        "Content".dimmed()
    );
    for (idx, item) in set.items.iter().enumerate() {
        let score = format!("{:<7.3}", item.score);
        let score = if item.score >= 0.7 {
            score.green().to_string()
        } else if item.score >= 0.4 {
            score.yellow().to_string()
        } else {
            score.red().to_string()
        };
        println!(
            "{:<4} {} {:<10} {}",
            format!("{}", idx + 1).bold(),
            score,
            item.short_id(8).cyan(),
            item.content.preview(PREVIEW_WIDTH)
        );
    }
}

// ---------------------------------------------------------------------------
// health
// ---------------------------------------------------------------------------

async fn cmd_health(config: &VectorWebConfig, json: bool) -> Result<()> {
    let backend = make_backend(config)?;
    let (status, report) = probe::probe_report(&backend).await;

    if json {
        let out = serde_json::json!({
            "endpoint": backend.endpoint(),
            "status": status,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", "VectorWeb Health".bold());
        println!("  {}  {}", "Endpoint:".dimmed(), backend.endpoint());
        let badge = match status {
            ConnectivityStatus::Connected => "connected".green().to_string(),
            _ => "disconnected".red().to_string(),
        };
        println!("  {}    {}", "Status:".dimmed(), badge);
        if let Some(report) = &report {
            if let Some(db) = &report.database {
                println!("  {}  {}", "Database:".dimmed(), db);
            }
            if let Some(detail) = &report.detail {
                println!("  {}    {}", "Detail:".dimmed(), detail.yellow());
            }
        }
    }

    if !status.is_connected() {
        std::process::exit(1);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config(config: &VectorWebConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("failed to render config")?;
    print!("{rendered}");
    Ok(())
}
