use std::path::PathBuf;

use kb_harvester_core::{ExtractionMode, HarvestSummary, PageOutcome};
use serde_json::{json, Value};

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, Clone)]
pub struct ManifestOptions {
    pub path: PathBuf,
    /// RFC 3339 timestamp supplied by the caller.
    pub generated_utc: String,
}

pub fn build_manifest(summary: &HarvestSummary, mode: ExtractionMode, generated_utc: &str) -> Value {
    let pages = summary
        .pages
        .iter()
        .map(|page| {
            let (status, sections, reason) = match &page.outcome {
                PageOutcome::Written { sections } => ("written", *sections, None),
                PageOutcome::Skipped { reason } => ("skipped", 0, Some(reason.as_str())),
            };
            json!({
                "url": page.url,
                "title": page.title,
                "status": status,
                "sections": sections,
                "reason": reason,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "generated_utc": generated_utc,
        "mode": mode.to_string(),
        "output": summary.output_path.display().to_string(),
        "page_count": summary.discovered,
        "written_count": summary.written_count(),
        "skipped_count": summary.skipped_count(),
        "pages": pages,
    })
}

pub fn write_manifest(
    summary: &HarvestSummary,
    mode: ExtractionMode,
    options: &ManifestOptions,
) -> Result<PathBuf, PersistError> {
    let manifest = build_manifest(summary, mode, &options.generated_utc);
    let pretty = serde_json::to_string_pretty(&manifest)
        .unwrap_or_else(|_| manifest.to_string());
    write_atomically(&options.path, &pretty)
}
