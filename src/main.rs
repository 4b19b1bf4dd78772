//! Crawlrank command-line interface
//!
//! Drives the same crawl and search interfaces a network transport would:
//! `crawl` runs a job to completion by polling `advance`, `search`/`stats`/
//! `suggest` query the index built over the stored pages.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use crawlrank::config::{CrawlConfig, Scope};
use crawlrank::crawler::{JobManager, JobStatus};
use crawlrank::rank::{SearchEngine, DEFAULT_ALPHA, DEFAULT_BETA};
use crawlrank::storage::{JsonStore, PageStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Crawlrank: crawl a web neighborhood and search it
#[derive(Parser, Debug)]
#[command(name = "crawlrank")]
#[command(about = "Bounded web crawler with hybrid BM25 + PageRank search", long_about = None)]
struct Cli {
    /// Storage backend for crawled pages
    #[arg(long, value_enum, default_value_t = Backend::Json, global = true)]
    backend: Backend,

    /// Data directory for the JSON backend
    #[arg(long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Database file for the SQLite backend
    #[arg(long, default_value = "./crawlrank.db", global = true)]
    database: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// One JSON document per page under the data directory
    Json,
    /// SQLite document database
    Sqlite,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a web neighborhood from a seed URL
    Crawl {
        /// Seed URL to start from
        start_url: String,

        /// Maximum link depth from the seed
        #[arg(long, default_value_t = 2)]
        max_depth: u32,

        /// Maximum number of pages to discover
        #[arg(long, default_value_t = 50)]
        max_pages: usize,

        /// Link eligibility: domain, host, or unrestricted
        #[arg(long, default_value = "host")]
        scope: Scope,
    },

    /// Query the index over crawled pages
    Search {
        /// Query string
        query: String,

        /// Weight for normalized BM25
        #[arg(long, default_value_t = DEFAULT_ALPHA)]
        alpha: f64,

        /// Weight for PageRank
        #[arg(long, default_value_t = DEFAULT_BETA)]
        beta: f64,

        /// Number of results
        #[arg(short, default_value_t = 10)]
        k: usize,
    },

    /// Show index statistics
    Stats,

    /// Autocomplete a query prefix
    Suggest {
        /// Query prefix
        prefix: String,

        /// Maximum number of suggestions
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let store = open_store(&cli)?;

    match cli.command {
        Command::Crawl {
            start_url,
            max_depth,
            max_pages,
            scope,
        } => {
            let config = CrawlConfig::new(start_url, max_depth, max_pages).with_scope(scope);
            run_crawl(store, config).await?;
        }
        Command::Search {
            query,
            alpha,
            beta,
            k,
        } => {
            let mut engine = SearchEngine::new(store);
            let response = engine.search(&query, alpha, beta, k)?;
            if response.results.is_empty() {
                println!("No results.");
            }
            for (rank, hit) in response.results.iter().enumerate() {
                let title = if hit.title.is_empty() {
                    hit.url.as_str()
                } else {
                    hit.title.as_str()
                };
                println!("{}. {}", rank + 1, title);
                println!("   {}", hit.url);
                println!("   score={:.4}  length={}", hit.score, hit.length);
                if !hit.snippet.is_empty() {
                    println!("   {}", hit.snippet);
                }
            }
        }
        Command::Stats => {
            let mut engine = SearchEngine::new(store);
            let stats = engine.stats()?;
            println!("Documents:       {}", stats.total_docs);
            println!("Vocabulary:      {}", stats.vocab_size);
            println!("Avg doc length:  {:.1}", stats.avg_doc_length);
        }
        Command::Suggest { prefix, limit } => {
            let mut engine = SearchEngine::new(store);
            for suggestion in engine.suggest(&prefix, limit)? {
                println!("{}", suggestion);
            }
        }
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawlrank=info,warn"),
            1 => EnvFilter::new("crawlrank=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open_store(cli: &Cli) -> anyhow::Result<Arc<dyn PageStore>> {
    let store: Arc<dyn PageStore> = match cli.backend {
        Backend::Json => Arc::new(
            JsonStore::new(&cli.data_dir)
                .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?,
        ),
        Backend::Sqlite => Arc::new(
            SqliteStore::new(&cli.database)
                .with_context(|| format!("opening database {}", cli.database.display()))?,
        ),
    };
    Ok(store)
}

/// Starts a job and polls `advance` until it reaches a terminal state
async fn run_crawl(store: Arc<dyn PageStore>, config: CrawlConfig) -> anyhow::Result<()> {
    let manager = JobManager::new(store);
    let job_id = manager.start_crawl(config).await?;

    loop {
        let snapshot = manager.advance_crawl(&job_id).await?;
        tracing::info!(
            "Progress: {}/{} completed, {} queued, {:.1}s",
            snapshot.stats.completed_pages,
            snapshot.stats.total_pages,
            snapshot.stats.queue_size,
            snapshot.stats.duration
        );

        if snapshot.stats.status != JobStatus::Crawling {
            let errors = snapshot
                .nodes
                .iter()
                .filter(|n| n.status == crawlrank::crawler::NodeStatus::Error)
                .count();
            println!(
                "Crawl {:?}: {} discovered, {} completed, {} errors in {:.1}s",
                snapshot.stats.status,
                snapshot.stats.total_pages,
                snapshot.stats.completed_pages,
                errors,
                snapshot.stats.duration
            );
            break;
        }
    }

    Ok(())
}
