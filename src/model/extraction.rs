// File: ./src/model/extraction.rs
use super::Locale;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};

/// Per-call environment of a parse: language, "now", and known names.
///
/// The reference time anchors every relative date ("tomorrow", "下周").
/// Candidate lists are supplied fresh by the caller on each call:
/// `None` means "no list given" and any tag body is accepted, while
/// `Some(list)` restricts matches to the names in `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionContext {
    pub locale: Locale,
    pub reference: NaiveDateTime,
    pub projects: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
}

impl ExtractionContext {
    pub fn new(locale: Locale, reference: NaiveDateTime) -> Self {
        Self {
            locale,
            reference,
            projects: None,
            labels: None,
        }
    }

    /// Context anchored at the current local time.
    pub fn now(locale: Locale) -> Self {
        Self::new(locale, Local::now().naive_local())
    }

    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects = Some(projects.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Date,
    Priority,
    Project,
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MatchValue {
    Date(NaiveDateTime),
    Priority(i64),
    Project(String),
    Label(String),
}

impl MatchValue {
    pub fn kind(&self) -> MatchKind {
        match self {
            MatchValue::Date(_) => MatchKind::Date,
            MatchValue::Priority(_) => MatchKind::Priority,
            MatchValue::Project(_) => MatchKind::Project,
            MatchValue::Label(_) => MatchKind::Label,
        }
    }
}

/// One candidate entity found by an extractor.
///
/// `start` and `end` are byte offsets into the scanned text and always fall
/// on char boundaries; `raw_text` is `text[start..end]` verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedMatch {
    pub extractor: &'static str,
    pub kind: MatchKind,
    pub value: MatchValue,
    pub raw_text: String,
    pub start: usize,
    pub end: usize,
}

impl ExtractedMatch {
    pub fn new(extractor: &'static str, text: &str, start: usize, end: usize, value: MatchValue) -> Self {
        Self {
            extractor,
            kind: value.kind(),
            raw_text: text[start..end].to_string(),
            start,
            end,
            value,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &ExtractedMatch) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Checks the span against the text it claims to come from.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
            && text[self.start..self.end] == self.raw_text
    }
}
