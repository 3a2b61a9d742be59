use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Written { sections: usize },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub url: String,
    pub title: Option<String>,
    pub outcome: PageOutcome,
}

/// What a finished run did, page by page, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestSummary {
    pub output_path: PathBuf,
    pub discovered: usize,
    pub pages: Vec<PageReport>,
}

impl HarvestSummary {
    pub fn new(output_path: PathBuf, discovered: usize) -> Self {
        Self {
            output_path,
            discovered,
            pages: Vec::with_capacity(discovered),
        }
    }

    pub fn record(&mut self, report: PageReport) {
        self.pages.push(report);
    }

    pub fn written_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Written { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Skipped { .. }))
            .count()
    }

    pub fn section_count(&self) -> usize {
        self.pages
            .iter()
            .map(|p| match p.outcome {
                PageOutcome::Written { sections } => sections,
                PageOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}
