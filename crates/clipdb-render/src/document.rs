use chrono::NaiveDateTime;

use clipdb_dedup::Clipping;

pub const DEFAULT_TITLE: &str = "Your Notes And Highlights";

/// One entry recovered from a book file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub body: String,
    pub metadata: Option<String>,
    pub added_at: Option<NaiveDateTime>,
}

impl Highlight {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into(), metadata: None, added_at: None }
    }
}

impl Clipping for Highlight {
    fn body(&self) -> &str {
        &self.body
    }

    fn added_at(&self) -> Option<NaiveDateTime> {
        self.added_at
    }
}

/// A finished, immutable document ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    entries: Vec<Highlight>,
}

impl Document {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[Highlight] {
        &self.entries
    }
}

#[derive(Debug, Default)]
pub struct DocumentBuilder {
    title: String,
    entries: Vec<Highlight>,
}

impl DocumentBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), entries: Vec::new() }
    }

    pub fn entry(mut self, highlight: Highlight) -> Self {
        self.entries.push(highlight);
        self
    }

    pub fn entries(mut self, highlights: impl IntoIterator<Item = Highlight>) -> Self {
        self.entries.extend(highlights);
        self
    }

    pub fn build(self) -> Document {
        let title = if self.title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            self.title
        };
        Document { title, entries: self.entries }
    }
}
