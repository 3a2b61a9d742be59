//! Run configuration: mode preset, then the optional RON file, then flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use kb_harvester_core::defaults::{
    DOMAIN_SUFFIX, FLAT_OUTPUT_FILE, LISTING_URL, LISTING_URL_PAGE_2, MIN_SECTION_CHARS,
    REQUEST_TIMEOUT_SECS, SECTIONED_OUTPUT_FILE,
};
use kb_harvester_core::ExtractionMode;
use kb_harvester_engine::{FetchSettings, HarvestSettings, ManifestOptions};
use log::LevelFilter;
use ron::extensions::Extensions;
use serde::Deserialize;

use crate::cli::Cli;

/// Settings file contents. Every field is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub mode: Option<ExtractionMode>,
    pub listing_urls: Option<Vec<String>>,
    pub domain_suffix: Option<String>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub min_section_chars: Option<usize>,
    pub manifest: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        let options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
        Ok(options.from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub mode: ExtractionMode,
    pub listing_urls: Vec<String>,
    pub domain_suffix: String,
    pub output: PathBuf,
    pub timeout: Duration,
    pub min_section_chars: usize,
    pub manifest: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl RunConfig {
    /// Built-in settings for `mode`: sectioned mode reads both listing pages,
    /// flat mode only the first.
    pub fn preset(mode: ExtractionMode) -> Self {
        let (listing_urls, output) = match mode {
            ExtractionMode::Sectioned => (
                vec![LISTING_URL.to_string(), LISTING_URL_PAGE_2.to_string()],
                SECTIONED_OUTPUT_FILE,
            ),
            ExtractionMode::Flat => (vec![LISTING_URL.to_string()], FLAT_OUTPUT_FILE),
        };
        Self {
            mode,
            listing_urls,
            domain_suffix: DOMAIN_SUFFIX.to_string(),
            output: PathBuf::from(output),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            min_section_chars: MIN_SECTION_CHARS,
            manifest: None,
            log_file: None,
            verbose: false,
        }
    }

    /// Reads `--config` if given and layers the flags on top.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(cli, file)
    }

    pub fn resolve(cli: &Cli, file: ConfigFile) -> Result<Self> {
        let mode = cli.mode.or(file.mode).unwrap_or_default();
        let mut config = Self::preset(mode);

        if let Some(urls) = file.listing_urls {
            config.listing_urls = urls;
        }
        if !cli.listing_urls.is_empty() {
            config.listing_urls = cli.listing_urls.clone();
        }
        if let Some(domain) = cli.domain.clone().or(file.domain_suffix) {
            config.domain_suffix = domain;
        }
        if let Some(output) = cli.output.clone().or(file.output) {
            config.output = output;
        }
        if let Some(secs) = cli.timeout_secs.or(file.timeout_secs) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(chars) = cli.min_section_chars.or(file.min_section_chars) {
            config.min_section_chars = chars;
        }
        config.manifest = cli.manifest.clone().or(file.manifest);
        config.log_file = cli.log_file.clone().or(file.log_file);
        config.verbose = cli.verbose;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.listing_urls.is_empty() {
            bail!("at least one listing URL is required");
        }
        for url in &self.listing_urls {
            url::Url::parse(url).with_context(|| format!("invalid listing URL '{url}'"))?;
        }
        if self.timeout.is_zero() {
            bail!("timeout must be at least one second");
        }
        if self.output.as_os_str().is_empty() {
            bail!("output path must not be empty");
        }
        Ok(())
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings::with_timeout(self.timeout)
    }

    pub fn harvest_settings(&self, generated_utc: String) -> HarvestSettings {
        let mut settings = HarvestSettings::new(self.listing_urls.clone(), self.output.clone());
        settings.domain_suffix = self.domain_suffix.clone();
        settings.mode = self.mode;
        settings.min_section_chars = self.min_section_chars;
        settings.manifest = self.manifest.clone().map(|path| ManifestOptions {
            path,
            generated_utc,
        });
        settings
    }
}
