use std::path::PathBuf;

use clap::Parser;
use kb_harvester_core::ExtractionMode;

/// Crawl the topic pages of a site into one plain-text knowledge base.
///
/// Every flag is optional. Unset values come from `--config`, then from the
/// built-in defaults for the chosen mode.
#[derive(Parser, Debug, Default)]
#[command(name = "kb_harvester", version)]
pub struct Cli {
    /// RON file with run settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extraction mode: `sectioned` or `flat`
    #[arg(long)]
    pub mode: Option<ExtractionMode>,

    /// Listing page to collect topic links from; repeat for several pages
    #[arg(long = "listing-url", value_name = "URL")]
    pub listing_urls: Vec<String>,

    /// Keep only links whose host ends with this suffix
    #[arg(long, value_name = "SUFFIX")]
    pub domain: Option<String>,

    /// Output text file, overwritten on every run
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Sections with this many characters or fewer are dropped
    #[arg(long, value_name = "CHARS")]
    pub min_section_chars: Option<usize>,

    /// Also write a JSON run manifest to this path
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Mirror log output into this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log per-page details
    #[arg(short, long)]
    pub verbose: bool,
}
