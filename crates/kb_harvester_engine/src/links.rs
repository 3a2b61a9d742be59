use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use kb_harvester_core::{host_matches_suffix, resolve_href, UrlSet};
use scraper::{Html, Selector};
use url::Url;

use crate::decode::decode_output;
use crate::fetch::Fetcher;
use crate::{FetchError, HarvestError, HarvestEvent, ProgressSink};

/// Same-site links of one listing page.
///
/// Every `<a href>` is resolved against `page_url`; URLs whose host ends with
/// `domain_suffix` are kept, fragment and query included. An unparsable
/// `page_url` yields an empty set.
pub fn collect_links(html: &str, page_url: &str, domain_suffix: &str) -> UrlSet {
    let mut links = UrlSet::new();
    let Ok(base) = Url::parse(page_url) else {
        return links;
    };
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let document = Html::parse_document(html);
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(url) = resolve_href(href, &base) {
            if host_matches_suffix(&url, domain_suffix) {
                links.insert(String::from(url));
            }
        }
    }
    links
}

/// Fetches listing pages and merges their same-site links.
pub struct LinkCollector {
    fetcher: Arc<dyn Fetcher>,
    domain_suffix: String,
}

impl LinkCollector {
    pub fn new(fetcher: Arc<dyn Fetcher>, domain_suffix: impl Into<String>) -> Self {
        Self {
            fetcher,
            domain_suffix: domain_suffix.into(),
        }
    }

    /// Sorted, duplicate-free topic URLs across all `listing_urls`.
    ///
    /// Any listing page that cannot be fetched aborts collection.
    pub async fn collect(
        &self,
        listing_urls: &[String],
        sink: &dyn ProgressSink,
    ) -> Result<Vec<String>, HarvestError> {
        let mut all = UrlSet::new();
        for listing_url in listing_urls {
            let found = self.collect_one(listing_url).await?;
            if found.is_empty() {
                engine_warn!("No same-site links found on {}", listing_url);
            } else {
                engine_info!("{} link(s) found on {}", found.len(), listing_url);
            }
            sink.emit(HarvestEvent::ListingScanned {
                url: listing_url.clone(),
                links_found: found.len(),
            });
            all.extend(found);
        }
        Ok(all.into_sorted_vec())
    }

    async fn collect_one(&self, listing_url: &str) -> Result<UrlSet, HarvestError> {
        let listing_error = |source: FetchError| HarvestError::Listing {
            url: listing_url.to_string(),
            source,
        };
        let output = self.fetcher.fetch(listing_url).await.map_err(listing_error)?;
        let decoded = decode_output(&output);
        if decoded.had_errors {
            engine_warn!(
                "Listing {} is not valid {}; bad bytes replaced",
                listing_url,
                decoded.encoding_label
            );
        }
        Ok(collect_links(
            &decoded.html,
            &output.metadata.final_url,
            &self.domain_suffix,
        ))
    }
}
