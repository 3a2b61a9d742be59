use std::sync::Arc;

use ego_tree::NodeRef;
use engine_logging::{engine_debug, engine_warn};
use kb_harvester_core::defaults::{EXCLUDED_TAGS, SECTION_BODY_TAGS, SECTION_HEADING_TAGS};
use kb_harvester_core::{
    clean_flat_text, clean_text, resolve_title, ExtractionMode, FlatPage, PageRecord,
    SectionBuilder,
};
use scraper::node::Node;
use scraper::Html;

use crate::decode::decode_output;
use crate::fetch::Fetcher;
use crate::PageExtraction;

/// Fetches a topic page and turns it into text in the configured mode.
///
/// Failures never propagate: a page that cannot be fetched comes back as
/// [`PageExtraction::Skipped`].
pub struct PageExtractor {
    fetcher: Arc<dyn Fetcher>,
    mode: ExtractionMode,
    min_section_chars: usize,
}

impl PageExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, mode: ExtractionMode, min_section_chars: usize) -> Self {
        Self {
            fetcher,
            mode,
            min_section_chars,
        }
    }

    pub async fn extract(&self, url: &str) -> PageExtraction {
        let output = match self.fetcher.fetch(url).await {
            Ok(output) => output,
            Err(error) => {
                engine_warn!("Could not fetch {}: {}", url, error);
                return PageExtraction::Skipped {
                    url: url.to_string(),
                    error,
                };
            }
        };
        let decoded = decode_output(&output);
        if decoded.had_errors {
            engine_warn!(
                "{} is not valid {}; bad bytes replaced",
                url,
                decoded.encoding_label
            );
        }
        engine_debug!(
            "Fetched {} ({} bytes, {})",
            url,
            output.metadata.byte_len,
            decoded.encoding_label
        );

        match self.mode {
            ExtractionMode::Flat => PageExtraction::Flat(extract_flat(&decoded.html, url)),
            ExtractionMode::Sectioned => PageExtraction::Sectioned(extract_sections(
                &decoded.html,
                url,
                self.min_section_chars,
            )),
        }
    }
}

/// All visible text of the page as one whitespace-normalized blob.
pub fn extract_flat(html: &str, url: &str) -> FlatPage {
    let doc = Html::parse_document(html);
    let root = *doc.root_element();
    FlatPage {
        url: url.to_string(),
        title: page_title(root, url),
        text: clean_flat_text(&visible_text(root)),
    }
}

/// Heading-delimited sections, or one title-keyed section holding the whole
/// page text when no section survives the noise threshold.
pub fn extract_sections(html: &str, url: &str, min_section_chars: usize) -> PageRecord {
    let doc = Html::parse_document(html);
    let root = *doc.root_element();
    let title = page_title(root, url);

    let mut builder = SectionBuilder::new(min_section_chars);
    walk_sections(root, &mut builder, false);

    PageRecord::assemble(url, title, builder.finish(), || {
        clean_text(&visible_text(root))
    })
}

/// `in_body` is set while inside a `p`/`li` that had to be opened up because
/// it holds a heading; its loose text then belongs to the running section.
fn walk_sections(node: NodeRef<'_, Node>, builder: &mut SectionBuilder, in_body: bool) {
    match node.value() {
        Node::Element(element) => {
            let name = element.name();
            if is_excluded(name) {
                return;
            }
            if tag_in(name, SECTION_HEADING_TAGS) {
                builder.start_heading(&visible_text(node));
            } else if tag_in(name, SECTION_BODY_TAGS) && !contains_heading(node) {
                // Nested p/li are part of this text already.
                builder.push_text(&visible_text(node));
            } else {
                let in_body = in_body || tag_in(name, SECTION_BODY_TAGS);
                for child in node.children() {
                    walk_sections(child, builder, in_body);
                }
            }
        }
        Node::Text(text) if in_body => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                builder.push_text(trimmed);
            }
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                walk_sections(child, builder, in_body);
            }
        }
        _ => {}
    }
}

fn contains_heading(node: NodeRef<'_, Node>) -> bool {
    node.descendants().skip(1).any(|child| match child.value() {
        Node::Element(element) => tag_in(element.name(), SECTION_HEADING_TAGS),
        _ => false,
    })
}

fn page_title(root: NodeRef<'_, Node>, url: &str) -> String {
    let raw = find_element(root, "title").map(visible_text);
    resolve_title(raw.as_deref(), url)
}

fn find_element<'a>(node: NodeRef<'a, Node>, tag: &str) -> Option<NodeRef<'a, Node>> {
    if let Node::Element(element) = node.value() {
        if is_excluded(element.name()) {
            return None;
        }
        if element.name().eq_ignore_ascii_case(tag) {
            return Some(node);
        }
    }
    node.children().find_map(|child| find_element(child, tag))
}

/// Trimmed, non-empty text nodes of the subtree joined by single spaces.
/// Excluded elements and comments contribute nothing.
fn visible_text(node: NodeRef<'_, Node>) -> String {
    let mut fragments = Vec::new();
    collect_text(node, &mut fragments);
    fragments.join(" ")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
        Node::Element(element) => {
            if is_excluded(element.name()) {
                return;
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

fn is_excluded(name: &str) -> bool {
    tag_in(name, EXCLUDED_TAGS)
}

fn tag_in(name: &str, tags: &[&str]) -> bool {
    tags.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}
