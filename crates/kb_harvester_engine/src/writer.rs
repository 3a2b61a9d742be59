use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use kb_harvester_core::{FlatPage, PageRecord};

use crate::persist::{ensure_output_dir, parent_dir, PersistError};
use crate::PageExtraction;

/// Written after every page entry.
pub const ENTRY_SEPARATOR: &str = "\n---\n\n";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("cannot prepare output location: {0}")]
    Persist(#[from] PersistError),
    #[error("cannot write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriteStats {
    pub pages_written: usize,
    pub sections_written: usize,
    pub bytes_written: u64,
}

/// Append-only knowledge-base file, opened once per run.
///
/// Any previous content at the path is discarded on [`create`](Self::create).
/// Each entry is flushed as soon as it is written, so an interrupted run
/// leaves a readable prefix of complete entries.
pub struct KnowledgeBaseWriter {
    path: PathBuf,
    out: BufWriter<File>,
    stats: WriteStats,
}

impl KnowledgeBaseWriter {
    pub fn create(path: &Path) -> Result<Self, WriteError> {
        ensure_output_dir(&parent_dir(path))?;
        let file = File::create(path).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            stats: WriteStats::default(),
        })
    }

    /// Appends one page. Skipped pages are omitted; returns whether anything
    /// was written.
    pub fn write_page(&mut self, page: &PageExtraction) -> Result<bool, WriteError> {
        let (entry, sections) = match page {
            PageExtraction::Sectioned(record) => (render_topic(record), record.sections.len()),
            PageExtraction::Flat(flat) => (render_flat(flat), 1),
            PageExtraction::Skipped { .. } => return Ok(false),
        };
        self.append(&entry)?;
        self.stats.pages_written += 1;
        self.stats.sections_written += sections;
        Ok(true)
    }

    pub fn finish(mut self) -> Result<WriteStats, WriteError> {
        self.out.flush().map_err(|source| self.io_error(source))?;
        Ok(self.stats)
    }

    fn append(&mut self, entry: &str) -> Result<(), WriteError> {
        let result = self
            .out
            .write_all(entry.as_bytes())
            .and_then(|_| self.out.flush());
        result.map_err(|source| self.io_error(source))?;
        self.stats.bytes_written += entry.len() as u64;
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> WriteError {
        WriteError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// `### Topic:` block with one `#### Subtopic:` per section.
pub fn render_topic(record: &PageRecord) -> String {
    let mut entry = format!("### Topic: {}\nSource: {}\n\n", record.title, record.url);
    for section in &record.sections {
        entry.push_str(&format!(
            "#### Subtopic: {}\n{}\n\n",
            section.heading, section.body
        ));
    }
    entry.push_str(ENTRY_SEPARATOR);
    entry
}

/// `### Page:` header followed by the page text.
pub fn render_flat(page: &FlatPage) -> String {
    format!("### Page: {}\n{}\n{}", page.url, page.text, ENTRY_SEPARATOR)
}
