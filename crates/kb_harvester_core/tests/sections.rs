use kb_harvester_core::{resolve_title, PageRecord, Section, SectionBuilder};
use pretty_assertions::assert_eq;

const LONG_BODY: &str =
    "Research data management covers planning, storing and sharing data during a project.";

#[test]
fn each_heading_starts_a_new_section() {
    engine_logging::initialize_for_tests();
    let mut builder = SectionBuilder::new(50);
    builder.start_heading("Storage");
    builder.push_text(LONG_BODY);
    builder.start_heading("  Sharing \n data ");
    builder.push_text("Share your");
    builder.push_text("data   through a trusted repository such as DataverseNL or Zenodo.");

    let sections = builder.finish();
    assert_eq!(
        sections,
        vec![
            Section::new("Storage", LONG_BODY),
            Section::new(
                "Sharing data",
                "Share your data through a trusted repository such as DataverseNL or Zenodo."
            ),
        ]
    );
}

#[test]
fn body_at_threshold_is_dropped_and_one_past_is_kept() {
    let at_threshold = "x".repeat(50);
    let past_threshold = "y".repeat(51);

    let mut builder = SectionBuilder::new(50);
    builder.start_heading("Short");
    builder.push_text(&at_threshold);
    builder.start_heading("Long");
    builder.push_text(&past_threshold);

    let sections = builder.finish();
    assert_eq!(sections, vec![Section::new("Long", past_threshold)]);
}

#[test]
fn threshold_applies_after_whitespace_collapsing() {
    // The space run collapses to one: 25 + 1 + 25 = 51 characters.
    let mut builder = SectionBuilder::new(50);
    builder.start_heading("Collapsed");
    builder.push_text(&format!("{}    ", "a".repeat(25)));
    builder.push_text(&"b".repeat(25));

    let sections = builder.finish();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].body.chars().count(), 51);
}

#[test]
fn text_before_first_heading_is_ignored() {
    let mut builder = SectionBuilder::new(10);
    builder.push_text("Intro paragraph that has no heading above it at all.");
    builder.start_heading("First");
    builder.push_text("Body of the first section.");

    let sections = builder.finish();
    assert_eq!(sections, vec![Section::new("First", "Body of the first section.")]);
}

#[test]
fn empty_heading_or_empty_buffer_commits_nothing() {
    let mut builder = SectionBuilder::new(0);
    builder.start_heading("   ");
    builder.push_text("orphaned text");
    builder.start_heading("No body");
    assert!(builder.finish().is_empty());
}

#[test]
fn record_falls_back_to_title_keyed_section() {
    let record = PageRecord::assemble("https://rdm.vu.nl/a", "Topic A", Vec::new(), || {
        "whole page text".to_string()
    });
    assert!(record.is_fallback);
    assert_eq!(record.sections, vec![Section::new("Topic A", "whole page text")]);
}

#[test]
fn record_keeps_sections_when_present() {
    let sections = vec![Section::new("H", LONG_BODY)];
    let record = PageRecord::assemble("https://rdm.vu.nl/a", "Topic A", sections.clone(), || {
        panic!("fallback must not be computed")
    });
    assert!(!record.is_fallback);
    assert_eq!(record.sections, sections);
}

#[test]
fn title_defaults_to_url() {
    assert_eq!(resolve_title(Some("  Data  "), "https://x.vu.nl"), "Data");
    assert_eq!(resolve_title(Some("   "), "https://x.vu.nl"), "https://x.vu.nl");
    assert_eq!(resolve_title(None, "https://x.vu.nl"), "https://x.vu.nl");
}
