use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use reelscrape::config::ScraperConfig;
use reelscrape::fetch::{Fetcher, HttpFetcher};
use reelscrape::site::SiteProfile;
use reelscrape::telemetry;

mod commands;

use commands::Ctx;

#[derive(Parser)]
#[command(name = "reelscrape", about = "Media site scraper CLI")]
struct Cli {
    /// Built-in site profile: willow or flixer
    #[arg(global = true, long, default_value = "willow")]
    site: String,
    /// Site profile JSON; overrides --site
    #[arg(global = true, long)]
    profile: Option<PathBuf>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Search(commands::search::SearchCmd),
    Details(commands::details::DetailsCmd),
    Episodes(commands::episodes::EpisodesCmd),
    Stream(commands::stream::StreamCmd),
    Extract(commands::extract::ExtractCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and SCRAPE_LOG_FORMAT
    telemetry::config::init_tracing();

    let profile = match &cli.profile {
        Some(path) => SiteProfile::from_json_file(path)?,
        None => SiteProfile::builtin(&cli.site).with_context(|| format!("unknown site {:?}", cli.site))?,
    };
    let cfg = ScraperConfig::from_env();
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&cfg.http()).context("building http client")?);
    let ctx = Ctx::new(profile, &cfg, fetcher);

    match cli.command {
        Commands::Search(args) => commands::search::run(&ctx, args).await?,
        Commands::Details(args) => commands::details::run(&ctx, args).await?,
        Commands::Episodes(args) => commands::episodes::run(&ctx, args).await?,
        Commands::Stream(args) => commands::stream::run(&ctx, args).await?,
        Commands::Extract(args) => commands::extract::run(&ctx, args)?,
    }

    Ok(())
}
