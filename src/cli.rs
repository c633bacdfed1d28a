// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands, one per crawl mode:
//   site-harvester images <URL> [--site --max-pages N --max-depth N] [--download]
//   site-harvester links  <URL> [--site --max-pages N --max-depth N]
//
// Without --site only the given page is harvested; --max-pages and
// --max-depth only apply in whole-site mode. --render switches page
// fetching from plain HTTP to a headless browser.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_USER_AGENT;

#[derive(Parser, Debug)]
#[command(
    name = "site-harvester",
    version = "0.1.0",
    about = "Crawl a website and harvest its images or links",
    long_about = "site-harvester visits a page (or a whole site, up to a page and depth limit), \
                  collects every image reference or hyperlink it finds, and saves them as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug details to stderr (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Harvest image references (img sources, lazy-load attributes, srcset, background images)
    ///
    /// Example: site-harvester images https://example.com --site --max-pages 10
    Images {
        #[command(flatten)]
        crawl: CrawlArgs,

        /// Where to write the JSON result
        #[arg(long, short, default_value = "images.json")]
        output: PathBuf,

        /// Download every harvested image after the crawl
        #[arg(long)]
        download: bool,

        /// Directory for downloaded images
        #[arg(long, default_value = "downloaded_images")]
        download_dir: PathBuf,

        /// How many images to download at once
        #[arg(long, default_value_t = 4)]
        download_concurrency: usize,

        /// Shortest random pause before each download, in milliseconds
        #[arg(long, default_value_t = 500)]
        download_min_delay_ms: u64,

        /// Longest random pause before each download, in milliseconds
        #[arg(long, default_value_t = 2000)]
        download_max_delay_ms: u64,
    },

    /// Harvest the hyperlinks of every visited page
    ///
    /// Example: site-harvester links https://example.com --site --max-depth 2
    Links {
        #[command(flatten)]
        crawl: CrawlArgs,

        /// Where to write the JSON result
        #[arg(long, short, default_value = "links.json")]
        output: PathBuf,
    },
}

/// Options shared by both modes
#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Page to start from (e.g., https://example.com)
    pub url: String,

    /// Crawl the whole site instead of just this page
    #[arg(long)]
    pub site: bool,

    /// Maximum number of pages to visit (whole-site mode)
    #[arg(long, default_value_t = 5)]
    pub max_pages: usize,

    /// Maximum crawl depth; 1 = just the starting page (whole-site mode)
    #[arg(long, default_value_t = 1)]
    pub max_depth: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pause between pages in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Fetch each page a second time to find its links
    /// (with --render, the second fetch is a plain HTTP GET)
    #[arg(long)]
    pub separate_link_fetch: bool,

    /// Load pages in headless Chrome so script-inserted content is seen
    #[arg(long)]
    pub render: bool,

    /// Also print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_defaults() {
        let cli = Cli::parse_from(["site-harvester", "images", "https://example.com"]);
        match cli.command {
            Commands::Images {
                crawl,
                output,
                download,
                ..
            } => {
                assert!(!crawl.site);
                assert_eq!(crawl.max_pages, 5);
                assert_eq!(crawl.max_depth, 1);
                assert_eq!(output, PathBuf::from("images.json"));
                assert!(!download);
                assert!(!crawl.render);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_site_mode_flags() {
        let cli = Cli::parse_from([
            "site-harvester",
            "links",
            "https://example.com",
            "--site",
            "--max-pages",
            "10",
            "--max-depth",
            "2",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Links { crawl, output } => {
                assert!(crawl.site);
                assert_eq!(crawl.max_pages, 10);
                assert_eq!(crawl.max_depth, 2);
                assert_eq!(output, PathBuf::from("links.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_render_with_separate_link_fetch() {
        let cli = Cli::parse_from([
            "site-harvester",
            "images",
            "https://example.com",
            "--render",
            "--separate-link-fetch",
            "--json",
        ]);
        match cli.command {
            Commands::Images { crawl, .. } => {
                assert!(crawl.render);
                assert!(crawl.separate_link_fetch);
                assert!(crawl.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
