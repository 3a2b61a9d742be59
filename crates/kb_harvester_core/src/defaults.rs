//! Built-in run parameters. Every value here can be overridden by the config
//! file or the command line.

/// First page of the topic listing.
pub const LISTING_URL: &str = "https://rdm.vu.nl/topics.html";

/// Second page of the topic listing (paginated view).
pub const LISTING_URL_PAGE_2: &str = "https://rdm.vu.nl/topics#listing-listing-page=2";

/// Links whose host does not end with this suffix are dropped.
pub const DOMAIN_SUFFIX: &str = "vu.nl";

/// Output file for sectioned mode.
pub const SECTIONED_OUTPUT_FILE: &str = "rdm_vu_knowledge_base.txt";

/// Output file for flat mode.
pub const FLAT_OUTPUT_FILE: &str = "rdm_vu_topics.txt";

/// Per-request timeout for every page fetch.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Sections whose normalized body is this long or shorter are treated as noise.
pub const MIN_SECTION_CHARS: usize = 50;

/// Elements removed before any text is extracted.
pub const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "noscript", "aside",
];

/// Elements that open a new section.
pub const SECTION_HEADING_TAGS: &[&str] = &["h2", "h3"];

/// Elements whose text feeds the current section.
pub const SECTION_BODY_TAGS: &[&str] = &["p", "li"];
