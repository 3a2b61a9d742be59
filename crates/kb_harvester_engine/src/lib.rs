//! Harvester engine: fetching, link collection, extraction and output.
mod decode;
mod extract;
mod fetch;
mod links;
mod manifest;
mod persist;
mod pipeline;
mod types;
mod writer;

pub use decode::{decode_html, decode_output, DecodedHtml};
pub use extract::{extract_flat, extract_sections, PageExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use links::{collect_links, LinkCollector};
pub use manifest::{build_manifest, write_manifest, ManifestOptions};
pub use persist::{ensure_output_dir, write_atomically, PersistError};
pub use pipeline::{HarvestError, HarvestSettings, Harvester, NullProgressSink, ProgressSink};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, HarvestEvent, PageExtraction};
pub use writer::{render_flat, render_topic, KnowledgeBaseWriter, WriteError, WriteStats, ENTRY_SEPARATOR};
