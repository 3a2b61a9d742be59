use std::sync::{Arc, Mutex};

use kb_harvester_core::{ExtractionMode, FlatPage, PageOutcome, PageRecord, Section};
use kb_harvester_engine::{
    render_flat, render_topic, FetchSettings, HarvestError, HarvestEvent, HarvestSettings,
    Harvester, KnowledgeBaseWriter, ManifestOptions, PageExtraction, ProgressSink,
    ReqwestFetcher, WriteError,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<HarvestEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<HarvestEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: HarvestEvent) {
        self.events.lock().unwrap().push(event);
    }
}

const PAGE_A: &str = r#"<html><head><title>Data storage</title></head><body>
<h2>Where to store</h2>
<p>Store research data on university-managed storage such as Research Drive.</p>
<h2>Backups</h2>
<p>Backups of Research Drive are made every day and kept for thirty days.</p>
</body></html>"#;

const PAGE_B: &str = r#"<html><head><title>Data sharing</title></head><body>
<div>Share data through a trusted repository.</div>
</body></html>"#;

fn listing(uri: &str) -> String {
    format!(
        r#"<html><body>
        <a href="b.html">B</a>
        <a href="{uri}/a.html">A</a>
        <a href="/a.html">A again</a>
        <a href="https://www.example.org/elsewhere">Off site</a>
        </body></html>"#
    )
}

async fn fixture_site() -> MockServer {
    let server = MockServer::start().await;
    let pages = [
        ("/topics.html", listing(&server.uri())),
        ("/a.html", PAGE_A.to_string()),
        ("/b.html", PAGE_B.to_string()),
    ];
    for (route, body) in pages {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .mount(&server)
            .await;
    }
    server
}

fn harvester(server: &MockServer, output: &std::path::Path, mode: ExtractionMode) -> Harvester {
    let mut settings =
        HarvestSettings::new(vec![format!("{}/topics.html", server.uri())], output);
    settings.domain_suffix = "127.0.0.1".to_string();
    settings.mode = mode;
    Harvester::new(
        settings,
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
    )
}

#[test]
fn topic_block_format() {
    let record = PageRecord {
        url: "https://rdm.vu.nl/a".into(),
        title: "A".into(),
        sections: vec![Section::new("One", "first"), Section::new("Two", "second")],
        is_fallback: false,
    };
    assert_eq!(
        render_topic(&record),
        "### Topic: A\nSource: https://rdm.vu.nl/a\n\n\
         #### Subtopic: One\nfirst\n\n\
         #### Subtopic: Two\nsecond\n\n\
         \n---\n\n"
    );
}

#[test]
fn flat_block_format() {
    let page = FlatPage {
        url: "https://rdm.vu.nl/a".into(),
        title: "A".into(),
        text: "all the text".into(),
    };
    assert_eq!(
        render_flat(&page),
        "### Page: https://rdm.vu.nl/a\nall the text\n\n---\n\n"
    );
}

#[test]
fn writer_truncates_previous_output_and_omits_skipped_pages() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("nested").join("kb.txt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "stale content from an earlier run").unwrap();

    let mut writer = KnowledgeBaseWriter::create(&path).unwrap();
    let flat = PageExtraction::Flat(FlatPage {
        url: "https://rdm.vu.nl/a".into(),
        title: "A".into(),
        text: "text".into(),
    });
    let skipped = PageExtraction::Skipped {
        url: "https://rdm.vu.nl/b".into(),
        error: kb_harvester_engine::FetchError {
            kind: kb_harvester_engine::FailureKind::Timeout,
            message: "timed out".into(),
        },
    };
    assert!(writer.write_page(&flat).unwrap());
    assert!(!writer.write_page(&skipped).unwrap());
    let stats = writer.finish().unwrap();

    assert_eq!(stats.pages_written, 1);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "### Page: https://rdm.vu.nl/a\ntext\n\n---\n\n");
    assert_eq!(stats.bytes_written, content.len() as u64);
}

#[test]
fn writer_creates_missing_parent_directory() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("out").join("kb.txt");
    let writer = KnowledgeBaseWriter::create(&path).unwrap();
    writer.finish().unwrap();
    assert!(path.is_file());
}

#[test]
fn writer_reports_parent_that_is_a_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();

    let result = KnowledgeBaseWriter::create(&blocker.join("kb.txt"));
    assert!(matches!(result, Err(WriteError::Persist(_))));
}

#[tokio::test]
async fn two_page_site_produces_two_topic_blocks() {
    let server = fixture_site().await;
    let temp = tempfile::TempDir::new().unwrap();
    let output = temp.path().join("rdm_vu_knowledge_base.txt");
    let sink = TestSink::default();

    let summary = harvester(&server, &output, ExtractionMode::Sectioned)
        .run(&sink)
        .await
        .unwrap();

    let uri = server.uri();
    let expected = format!(
        "### Topic: Data storage\nSource: {uri}/a.html\n\n\
         #### Subtopic: Where to store\n\
         Store research data on university-managed storage such as Research Drive.\n\n\
         #### Subtopic: Backups\n\
         Backups of Research Drive are made every day and kept for thirty days.\n\n\
         \n---\n\n\
         ### Topic: Data sharing\nSource: {uri}/b.html\n\n\
         #### Subtopic: Data sharing\n\
         Data sharing Share data through a trusted repository.\n\n\
         \n---\n\n"
    );
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content, expected);
    assert_eq!(content.matches("\n---\n").count(), 2);

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.written_count(), 2);
    assert_eq!(summary.section_count(), 3);

    let events = sink.take();
    assert_eq!(events.first(), Some(&HarvestEvent::ListingScanned {
        url: format!("{uri}/topics.html"),
        links_found: 2,
    }));
    assert!(events.contains(&HarvestEvent::LinksCollected { total: 2 }));
    assert!(events.contains(&HarvestEvent::PageStarted {
        index: 2,
        total: 2,
        url: format!("{uri}/b.html"),
    }));
    assert_eq!(events.last(), Some(&HarvestEvent::OutputFinished {
        path: output.clone(),
        pages_written: 2,
    }));
}

#[tokio::test]
async fn failing_topic_page_is_skipped_and_run_continues() {
    let server = MockServer::start().await;
    let body = r#"<a href="/broken.html">x</a><a href="/ok.html">y</a>"#;
    Mock::given(method("GET"))
        .and(path("/topics.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE_B, "text/html"))
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let output = temp.path().join("kb.txt");
    let manifest = temp.path().join("manifest.json");
    let mut settings = harvester(&server, &output, ExtractionMode::Flat)
        .settings()
        .clone();
    settings.manifest = Some(ManifestOptions {
        path: manifest.clone(),
        generated_utc: "2026-01-01T00:00:00Z".to_string(),
    });
    let with_manifest = Harvester::new(
        settings,
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
    );

    let summary = with_manifest.run(&TestSink::default()).await.unwrap();

    assert_eq!(summary.skipped_count(), 1);
    assert_eq!(summary.written_count(), 1);
    assert!(matches!(
        summary.pages[0].outcome,
        PageOutcome::Skipped { ref reason } if reason.contains("404")
    ));

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        format!(
            "### Page: {}/ok.html\nData sharing Share data through a trusted repository.\n\n---\n\n",
            server.uri()
        )
    );

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(manifest["mode"], "flat");
    assert_eq!(manifest["page_count"], 2);
    assert_eq!(manifest["skipped_count"], 1);
    assert_eq!(manifest["pages"][0]["status"], "skipped");
    assert_eq!(manifest["pages"][1]["status"], "written");
    assert_eq!(manifest["generated_utc"], "2026-01-01T00:00:00Z");
}

#[tokio::test]
async fn unreachable_listing_aborts_before_output_is_created() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topics.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let output = temp.path().join("kb.txt");
    let err = harvester(&server, &output, ExtractionMode::Sectioned)
        .run(&TestSink::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Listing { .. }));
    assert!(!output.exists());
}
