use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use kb_harvester_core::defaults::{DOMAIN_SUFFIX, MIN_SECTION_CHARS};
use kb_harvester_core::{ExtractionMode, HarvestSummary, PageReport};

use crate::extract::PageExtractor;
use crate::fetch::Fetcher;
use crate::links::LinkCollector;
use crate::manifest::{write_manifest, ManifestOptions};
use crate::persist::PersistError;
use crate::writer::{KnowledgeBaseWriter, WriteError};
use crate::{FetchError, HarvestEvent};

#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("failed to fetch listing page {url}: {source}")]
    Listing { url: String, source: FetchError },
    #[error("failed to write output: {0}")]
    Output(#[from] WriteError),
    #[error("failed to write manifest: {0}")]
    Manifest(#[from] PersistError),
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: HarvestEvent) {}
}

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub listing_urls: Vec<String>,
    pub domain_suffix: String,
    pub mode: ExtractionMode,
    pub output_path: PathBuf,
    pub min_section_chars: usize,
    pub manifest: Option<ManifestOptions>,
}

impl HarvestSettings {
    pub fn new(listing_urls: Vec<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            listing_urls,
            domain_suffix: DOMAIN_SUFFIX.to_string(),
            mode: ExtractionMode::default(),
            output_path: output_path.into(),
            min_section_chars: MIN_SECTION_CHARS,
            manifest: None,
        }
    }
}

/// Sequential crawl: listing pages, then one topic page at a time into a
/// single output file.
pub struct Harvester {
    settings: HarvestSettings,
    fetcher: Arc<dyn Fetcher>,
}

impl Harvester {
    pub fn new(settings: HarvestSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { settings, fetcher }
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    pub async fn run(&self, sink: &dyn ProgressSink) -> Result<HarvestSummary, HarvestError> {
        let settings = &self.settings;

        engine_info!("Fetching topic links...");
        let collector = LinkCollector::new(self.fetcher.clone(), settings.domain_suffix.clone());
        let topic_urls = collector.collect(&settings.listing_urls, sink).await?;
        let total = topic_urls.len();
        engine_info!("Found {} topic pages.", total);
        sink.emit(HarvestEvent::LinksCollected { total });

        let extractor = PageExtractor::new(
            self.fetcher.clone(),
            settings.mode,
            settings.min_section_chars,
        );
        let mut writer = KnowledgeBaseWriter::create(&settings.output_path)?;
        let mut summary = HarvestSummary::new(settings.output_path.clone(), total);

        for (i, url) in topic_urls.iter().enumerate() {
            let index = i + 1;
            engine_info!("[{}/{}] Scraping {}", index, total, url);
            sink.emit(HarvestEvent::PageStarted {
                index,
                total,
                url: url.clone(),
            });

            let page = extractor.extract(url).await;
            writer.write_page(&page)?;

            let outcome = page.outcome();
            summary.record(PageReport {
                url: url.clone(),
                title: page.title().map(ToOwned::to_owned),
                outcome: outcome.clone(),
            });
            sink.emit(HarvestEvent::PageFinished {
                index,
                url: url.clone(),
                outcome,
            });
        }

        let stats = writer.finish()?;
        if summary.skipped_count() > 0 {
            engine_warn!(
                "{} of {} page(s) could not be fetched and were left out",
                summary.skipped_count(),
                total
            );
        }
        engine_info!(
            "Done! {} page(s), {} section(s) saved to {}",
            stats.pages_written,
            stats.sections_written,
            settings.output_path.display()
        );
        sink.emit(HarvestEvent::OutputFinished {
            path: settings.output_path.clone(),
            pages_written: stats.pages_written,
        });

        if let Some(options) = &settings.manifest {
            let path = write_manifest(&summary, settings.mode, options)?;
            engine_info!("Run manifest saved to {}", path.display());
        }

        Ok(summary)
    }
}
