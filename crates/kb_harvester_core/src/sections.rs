use crate::page::Section;
use crate::text::{clean_text, exceeds_noise_threshold};

/// Accumulates body text under the most recent heading and commits a
/// [`Section`] each time a new heading arrives or the page ends.
///
/// Text seen before the first heading is not attributed to any section.
#[derive(Debug)]
pub struct SectionBuilder {
    min_chars: usize,
    current_heading: Option<String>,
    buffer: Vec<String>,
    sections: Vec<Section>,
}

impl SectionBuilder {
    pub fn new(min_chars: usize) -> Self {
        Self {
            min_chars,
            current_heading: None,
            buffer: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn start_heading(&mut self, heading: &str) {
        self.commit();
        self.current_heading = Some(clean_text(heading));
        self.buffer.clear();
    }

    pub fn push_text(&mut self, text: &str) {
        if self.current_heading.is_some() {
            self.buffer.push(text.to_string());
        }
    }

    pub fn finish(mut self) -> Vec<Section> {
        self.commit();
        self.sections
    }

    fn commit(&mut self) {
        let heading = match self.current_heading.take() {
            Some(h) if !h.is_empty() => h,
            _ => return,
        };
        if self.buffer.is_empty() {
            return;
        }
        let body = clean_text(&self.buffer.join(" "));
        self.buffer.clear();
        if exceeds_noise_threshold(&body, self.min_chars) {
            self.sections.push(Section::new(heading, body));
        }
    }
}
