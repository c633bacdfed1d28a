// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Crawl the page or site in the chosen mode
// 4. Save the result as JSON, optionally download the images
// 5. Exit with proper code (0 = done, even with nothing found; 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod fetch;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CrawlArgs};
use config::{CrawlConfig, DownloadConfig};
use crawl::{CrawlResult, Crawler};
use extract::{ImageExtractor, LinkExtractor, PageExtractor};
use fetch::{HttpFetcher, RenderedFetcher};

// Status lines go to stderr under --json so stdout carries only the JSON
macro_rules! status {
    ($json:expr, $($arg:tt)*) => {
        if $json {
            eprintln!($($arg)*);
        } else {
            println!($($arg)*);
        }
    };
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Images {
            crawl,
            output,
            download,
            download_dir,
            download_concurrency,
            download_min_delay_ms,
            download_max_delay_ms,
        } => {
            let download = download.then(|| {
                DownloadConfig::default()
                    .with_directory(download_dir)
                    .with_concurrency(download_concurrency)
                    .with_delay_range(
                        Duration::from_millis(download_min_delay_ms),
                        Duration::from_millis(download_max_delay_ms),
                    )
                    .with_referer(crawl.url.clone())
                    .with_user_agent(crawl.user_agent.clone())
            });
            handle_images(&crawl, &output, download).await
        }
        Commands::Links { crawl, output } => handle_links(&crawl, &output).await,
    }
}

// Logs always go to stderr, like the status lines do under --json
fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "site_harvester=debug"
    } else {
        "site_harvester=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Maps CLI flags onto crawl settings; single-page mode ignores the limits
fn crawl_config(args: &CrawlArgs) -> CrawlConfig {
    let config = if args.site {
        CrawlConfig::default()
            .with_max_pages(args.max_pages)
            .with_max_depth(args.max_depth)
    } else {
        CrawlConfig::single_page()
    };

    config
        .with_timeout(Duration::from_secs(args.timeout))
        .with_user_agent(args.user_agent.clone())
        .with_delay(Duration::from_millis(args.delay_ms))
        .with_separate_link_fetch(args.separate_link_fetch)
}

async fn run_crawl<E: PageExtractor>(
    args: &CrawlArgs,
    extractor: E,
) -> Result<CrawlResult<E::Item>> {
    let config = crawl_config(args);

    if args.site {
        status!(
            args.json,
            "🔍 Crawling site: {} (max pages: {}, max depth: {})",
            args.url,
            config.max_pages,
            config.max_depth
        );
    } else {
        status!(args.json, "🔍 Harvesting page: {}", args.url);
    }

    let http = HttpFetcher::new(&config).context("Failed to set up page fetcher")?;

    let crawler = if args.render {
        // Each page waits for the element this mode harvests
        let rendered = RenderedFetcher::launch(&config, extractor.ready_selector())
            .await
            .context("Failed to start headless browser (is Chrome installed?)")?;
        let separate = config.separate_link_fetch;
        let crawler = Crawler::new(Arc::new(rendered), extractor, config);
        // Rendered page for the harvest, plain GET for the anchors
        if separate {
            crawler.with_link_fetcher(Arc::new(http))
        } else {
            crawler
        }
    } else {
        Crawler::new(Arc::new(http), extractor, config)
    };
    let result = crawler.crawl(&args.url).await;

    status!(args.json, "📄 Visited {} page(s)", result.visited.len());
    if !result.failed.is_empty() {
        status!(args.json, "⚠️  {} page(s) could not be fetched", result.failed.len());
    }
    Ok(result)
}

async fn handle_images(
    args: &CrawlArgs,
    output: &Path,
    download: Option<DownloadConfig>,
) -> Result<i32> {
    let result = run_crawl(args, ImageExtractor).await?;
    let images = result.items;

    if images.is_empty() {
        status!(args.json, "✅ No images found");
        return Ok(0);
    }

    status!(args.json, "🖼️  Found {} image reference(s)", images.len());
    save_and_print(&images, output, args.json)?;

    if let Some(config) = download {
        status!(args.json, "\n⬇️  Downloading into {}...", config.directory.display());
        let summary = output::download_assets(&images, &config).await?;
        status!(
            args.json,
            "📊 Downloaded {}/{} image(s) ({} already present, {} failed)",
            summary.downloaded,
            summary.total,
            summary.skipped_existing,
            summary.failed
        );
    }

    Ok(0)
}

async fn handle_links(args: &CrawlArgs, output: &Path) -> Result<i32> {
    let result = run_crawl(args, LinkExtractor).await?;
    let links = result.items;

    if links.is_empty() {
        status!(args.json, "✅ No links found");
        return Ok(0);
    }

    let unique: HashSet<&String> = links.iter().collect();
    status!(args.json, "🔗 Found {} link(s), {} unique", links.len(), unique.len());
    save_and_print(&links, output, args.json)?;

    Ok(0)
}

fn save_and_print<T: serde::Serialize>(items: &[T], output: &Path, json: bool) -> Result<()> {
    let written = output::save_json(items, output)?;
    status!(json, "💾 Saved {} entries to {}", written, output.display());

    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    }
    Ok(())
}
