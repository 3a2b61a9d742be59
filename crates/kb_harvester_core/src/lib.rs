//! Harvester core: pure data model plus the text and URL rules, no IO.
pub mod defaults;
mod page;
mod report;
mod sections;
mod text;
mod url_set;

pub use page::{resolve_title, ExtractionMode, FlatPage, PageRecord, Section};
pub use report::{HarvestSummary, PageOutcome, PageReport};
pub use sections::SectionBuilder;
pub use text::{clean_flat_text, clean_text, exceeds_noise_threshold, remove_blank_lines};
pub use url_set::{host_matches_suffix, resolve_href, UrlSet};
