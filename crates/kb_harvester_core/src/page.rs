use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a topic page is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// One undivided text blob per page.
    Flat,
    /// Heading-delimited blocks per page.
    #[default]
    Sectioned,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Flat => write!(f, "flat"),
            ExtractionMode::Sectioned => write!(f, "sectioned"),
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(ExtractionMode::Flat),
            "sectioned" | "sections" => Ok(ExtractionMode::Sectioned),
            other => Err(format!("unknown extraction mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
        }
    }
}

/// A page extracted in sectioned mode. `sections` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub sections: Vec<Section>,
    /// Set when no heading-delimited section survived and the whole page text
    /// was used instead.
    pub is_fallback: bool,
}

impl PageRecord {
    /// Build a record, falling back to one title-keyed section holding the
    /// whole page text when `sections` is empty.
    pub fn assemble(
        url: impl Into<String>,
        title: impl Into<String>,
        sections: Vec<Section>,
        fallback_body: impl FnOnce() -> String,
    ) -> Self {
        let title = title.into();
        if sections.is_empty() {
            let fallback = Section::new(title.clone(), fallback_body());
            return Self {
                url: url.into(),
                title,
                sections: vec![fallback],
                is_fallback: true,
            };
        }
        Self {
            url: url.into(),
            title,
            sections,
            is_fallback: false,
        }
    }
}

/// A page extracted in flat mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatPage {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// Page title with the URL as fallback for a missing or blank `<title>`.
pub fn resolve_title(raw: Option<&str>, url: &str) -> String {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| url.to_string())
}
