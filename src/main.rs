//! # trawl CLI Application
//!
//! Command-line front end for the crawl frontier and the rewrite proxy.
//!
//! - `serve`: Run the HTTP API
//! - `crawl`: Run one crawl invocation against the local database
//! - `submit`: Add or reprioritize a URL in the queue
//! - `stats`: Summarize the queue and the page store
//! - `search`: Keyword search over the stored pages
//! - `proxy`: Fetch and rewrite a single page
//!
//! Every option can also be set through a `TRAWL_*` environment variable.

mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use telemetry::TelemetryOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};
use trawl::crawler::{CrawlRequest, Crawler, CrawlerConfig, SearchRequest};
use trawl::index::Database;
use trawl::proxy::{Proxy, ProxyConfig};
use trawl::server::{AppState, HttpServer};
use trawl::{DEFAULT_LISTEN_ADDR, ServerConfig};

#[derive(Parser)]
#[command(author, version, about = "Priority crawl frontier, page store and framing proxy", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Database path
    #[arg(long, global = true, env = "TRAWL_DATABASE", default_value = "trawl.db")]
    database: PathBuf,

    /// User agent announced by the crawler
    #[arg(long, global = true, env = "TRAWL_USER_AGENT")]
    user_agent: Option<String>,

    /// Timeout for a single page fetch in seconds
    #[arg(long, global = true, env = "TRAWL_FETCH_TIMEOUT_SECS", default_value = "10")]
    fetch_timeout_secs: u64,

    /// Directory for a daily rolling log file
    #[arg(long, global = true, env = "TRAWL_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Export traces and metrics over OTLP/HTTP
    #[arg(long, global = true, env = "TRAWL_OTLP")]
    otlp: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Crawl pending URLs, or a single URL
    Crawl(CrawlArgs),

    /// Add a URL to the crawl queue
    Submit(SubmitArgs),

    /// Show queue and page store statistics
    Stats,

    /// Search the stored pages
    Search(SearchArgs),

    /// Fetch a page through the rewrite proxy
    Proxy(ProxyArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "TRAWL_LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,

    /// Do not answer CORS preflights
    #[arg(long)]
    no_cors: bool,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Crawl only this URL
    #[arg(short, long)]
    url: Option<String>,

    /// Maximum number of queued URLs to crawl
    #[arg(short, long, default_value = "5")]
    max_urls: usize,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// URL to queue
    #[arg(required = true)]
    url: String,

    /// Priority from 1 (lowest) to 10 (highest)
    #[arg(short, long)]
    priority: Option<i64>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search terms
    #[arg(required = true)]
    query: String,

    /// Number of results per page
    #[arg(short, long, default_value = "10")]
    limit: i64,

    /// Number of results to skip
    #[arg(short, long, default_value = "0")]
    offset: i64,
}

#[derive(Args, Debug)]
struct ProxyArgs {
    /// URL to fetch
    #[arg(required = true)]
    url: String,

    /// Write the body to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(&TelemetryOptions {
        log_dir: cli.global.log_dir.clone(),
        otlp: cli.global.otlp,
    })?;

    match cli.command {
        Commands::Serve(args) => serve_command(&cli.global, args).await?,
        Commands::Crawl(args) => crawl_command(&cli.global, args).await?,
        Commands::Submit(args) => submit_command(&cli.global, args).await?,
        Commands::Stats => stats_command(&cli.global).await?,
        Commands::Search(args) => search_command(&cli.global, args).await?,
        Commands::Proxy(args) => proxy_command(args).await?,
    }

    Ok(())
}

async fn open_crawler(global: &GlobalArgs) -> anyhow::Result<Crawler> {
    let path = global.database.to_string_lossy();
    let db = Database::new_from_path(&path)
        .await
        .with_context(|| format!("Failed to open database {}", path))?;

    let mut config =
        CrawlerConfig::builder().fetch_timeout(Duration::from_secs(global.fetch_timeout_secs));
    if let Some(user_agent) = &global.user_agent {
        config = config.user_agent(user_agent.clone());
    }

    Ok(Crawler::new(db, config.build())?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[instrument(skip(global))]
async fn serve_command(global: &GlobalArgs, args: ServeArgs) -> anyhow::Result<()> {
    let state = AppState {
        crawler: Arc::new(open_crawler(global).await?),
        proxy: Arc::new(Proxy::new(ProxyConfig::default())?),
    };
    let config = ServerConfig {
        listen_addr: args.listen,
        cors_enabled: !args.no_cors,
    };

    HttpServer::new(config, state)
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

#[instrument(skip(global))]
async fn crawl_command(global: &GlobalArgs, args: CrawlArgs) -> anyhow::Result<()> {
    let crawler = open_crawler(global).await?;

    let report = crawler
        .run(CrawlRequest {
            url: args.url,
            max_urls: Some(args.max_urls),
        })
        .await?;

    print_json(&report)
}

#[instrument(skip(global))]
async fn submit_command(global: &GlobalArgs, args: SubmitArgs) -> anyhow::Result<()> {
    let crawler = open_crawler(global).await?;

    let submission = crawler.submit(&args.url, args.priority).await?;
    if submission.created {
        println!("URL added to crawl queue");
    } else {
        println!("URL already in queue, updated priority");
    }

    print_json(&submission.entry)
}

#[instrument(skip(global))]
async fn stats_command(global: &GlobalArgs) -> anyhow::Result<()> {
    let crawler = open_crawler(global).await?;
    print_json(&crawler.stats().await?)
}

#[instrument(skip(global))]
async fn search_command(global: &GlobalArgs, args: SearchArgs) -> anyhow::Result<()> {
    let crawler = open_crawler(global).await?;

    let results = crawler
        .search(SearchRequest {
            query: Some(args.query),
            limit: Some(args.limit),
            offset: Some(args.offset),
        })
        .await?;

    print_json(&results)
}

#[instrument]
async fn proxy_command(args: ProxyArgs) -> anyhow::Result<()> {
    let proxy = Proxy::new(ProxyConfig::default())?;
    let response = proxy.fetch(&args.url).await?;
    info!(
        "Fetched {} bytes of {}",
        response.body.len(),
        response.content_type
    );

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &response.body).await?;
            println!("Saved proxied content to {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&response.body).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}
