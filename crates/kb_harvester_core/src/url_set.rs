use std::collections::BTreeSet;

use url::Url;

/// Deduplicated set of absolute URLs, iterated in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSet {
    urls: BTreeSet<String>,
}

impl UrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the URL was already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn extend(&mut self, other: UrlSet) {
        self.urls.extend(other.urls);
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn into_sorted_vec(self) -> Vec<String> {
        self.urls.into_iter().collect()
    }
}

impl FromIterator<String> for UrlSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}

/// Resolve an `href` against the page it was found on.
///
/// An empty or fragment-only reference resolves to the page itself. Nothing
/// is filtered here; host-less results such as `mailto:` fall out at the
/// suffix check.
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Host suffix match, case-insensitive. `rdm.vu.nl` matches `vu.nl`.
pub fn host_matches_suffix(url: &Url, suffix: &str) -> bool {
    let suffix = suffix.trim().trim_start_matches('.');
    if suffix.is_empty() {
        return url.host_str().is_some();
    }
    url.host_str()
        .map(|host| {
            host.to_ascii_lowercase()
                .ends_with(&suffix.to_ascii_lowercase())
        })
        .unwrap_or(false)
}
