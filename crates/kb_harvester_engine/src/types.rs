use std::fmt;
use std::path::PathBuf;

use kb_harvester_core::{FlatPage, PageOutcome, PageRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEvent {
    /// A listing page was fetched and scanned.
    ListingScanned { url: String, links_found: usize },
    /// All listing pages are done; `total` topic pages will be processed.
    LinksCollected { total: usize },
    /// Page `index` (1-based) of `total` is about to be fetched.
    PageStarted {
        index: usize,
        total: usize,
        url: String,
    },
    PageFinished {
        index: usize,
        url: String,
        outcome: PageOutcome,
    },
    OutputFinished { path: PathBuf, pages_written: usize },
}

/// Result of running the Page Extractor on one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageExtraction {
    Sectioned(PageRecord),
    Flat(FlatPage),
    Skipped { url: String, error: FetchError },
}

impl PageExtraction {
    pub fn url(&self) -> &str {
        match self {
            PageExtraction::Sectioned(record) => &record.url,
            PageExtraction::Flat(page) => &page.url,
            PageExtraction::Skipped { url, .. } => url,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            PageExtraction::Sectioned(record) => Some(&record.title),
            PageExtraction::Flat(page) => Some(&page.title),
            PageExtraction::Skipped { .. } => None,
        }
    }

    pub fn outcome(&self) -> PageOutcome {
        match self {
            PageExtraction::Sectioned(record) => PageOutcome::Written {
                sections: record.sections.len(),
            },
            PageExtraction::Flat(_) => PageOutcome::Written { sections: 1 },
            PageExtraction::Skipped { error, .. } => PageOutcome::Skipped {
                reason: error.to_string(),
            },
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, PageExtraction::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// Address after redirects; relative links resolve against it.
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
