use engine_logging::engine_debug;
use kb_harvester_core::PageOutcome;
use kb_harvester_engine::{HarvestEvent, ProgressSink};

/// Per-page detail at debug level; the pipeline itself logs the headline
/// progress.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::ListingScanned { url, links_found } => {
                engine_debug!("Listing {} yielded {} link(s)", url, links_found);
            }
            HarvestEvent::PageFinished {
                index,
                url,
                outcome: PageOutcome::Written { sections },
            } => {
                engine_debug!("#{} {}: {} section(s) written", index, url, sections);
            }
            HarvestEvent::PageFinished {
                index,
                url,
                outcome: PageOutcome::Skipped { reason },
            } => {
                engine_debug!("#{} {}: skipped ({})", index, url, reason);
            }
            HarvestEvent::LinksCollected { .. }
            | HarvestEvent::PageStarted { .. }
            | HarvestEvent::OutputFinished { .. } => {}
        }
    }
}
