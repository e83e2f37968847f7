// File: ./src/parser/processors.rs
//! Processors turn the surviving raw matches of one kind into a typed value.
//!
//! Processors are pure: they see only the matches and the context, never the
//! original text.

use crate::model::{ExtractedMatch, ExtractionContext, MatchKind, MatchValue};
use chrono::{Datelike, NaiveDateTime};

pub const DATE_PROCESSOR: &str = "date-processor";
pub const PRIORITY_PROCESSOR: &str = "priority-processor";
pub const LABEL_PROCESSOR: &str = "label-processor";
pub const PROJECT_PROCESSOR: &str = "project-processor";

/// Priorities follow iCalendar: 1 is the highest, 9 the lowest.
pub const PRIORITY_RANGE: std::ops::RangeInclusive<u8> = 1..=9;

/// Dates further than this from the reference are treated as mis-parses.
pub const MAX_YEARS_FROM_REFERENCE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedValue {
    Date(Option<NaiveDateTime>),
    Priority(Option<u8>),
    Labels(Vec<String>),
    Project(Option<String>),
}

pub trait Processor: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// The match kind this processor consumes.
    fn kind(&self) -> MatchKind;

    /// `matches` holds only matches of `self.kind()`, in text order.
    fn process(&self, matches: &[ExtractedMatch], ctx: &ExtractionContext) -> ProcessedValue;
}

/// Keeps the leftmost date that lies within a plausible window around the reference.
#[derive(Debug, Default)]
pub struct DateProcessor;

impl Processor for DateProcessor {
    fn name(&self) -> &'static str {
        DATE_PROCESSOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Date
    }

    fn process(&self, matches: &[ExtractedMatch], ctx: &ExtractionContext) -> ProcessedValue {
        let reference_year = ctx.reference.year();
        let date = matches
            .iter()
            .filter_map(|m| match m.value {
                MatchValue::Date(d) => Some((m, d)),
                _ => None,
            })
            .find(|(m, d)| {
                let plausible = (d.year() - reference_year).abs() <= MAX_YEARS_FROM_REFERENCE;
                if !plausible {
                    log::debug!("{}: rejecting '{}' ({})", DATE_PROCESSOR, m.raw_text, d);
                }
                plausible
            })
            .map(|(_, d)| d);
        ProcessedValue::Date(date)
    }
}

/// Keeps the leftmost priority, clamped to [`PRIORITY_RANGE`].
#[derive(Debug, Default)]
pub struct PriorityProcessor;

impl Processor for PriorityProcessor {
    fn name(&self) -> &'static str {
        PRIORITY_PROCESSOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Priority
    }

    fn process(&self, matches: &[ExtractedMatch], _ctx: &ExtractionContext) -> ProcessedValue {
        let priority = matches.iter().find_map(|m| match m.value {
            MatchValue::Priority(p) => {
                let clamped = p.clamp(
                    i64::from(*PRIORITY_RANGE.start()),
                    i64::from(*PRIORITY_RANGE.end()),
                );
                u8::try_from(clamped).ok()
            }
            _ => None,
        });
        ProcessedValue::Priority(priority)
    }
}

/// Labels in order of appearance, without blanks or case-insensitive repeats.
#[derive(Debug, Default)]
pub struct LabelProcessor;

impl Processor for LabelProcessor {
    fn name(&self) -> &'static str {
        LABEL_PROCESSOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Label
    }

    fn process(&self, matches: &[ExtractedMatch], _ctx: &ExtractionContext) -> ProcessedValue {
        let mut labels: Vec<String> = Vec::new();
        for m in matches {
            let MatchValue::Label(label) = &m.value else {
                continue;
            };
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            let lower = label.to_lowercase();
            if !labels.iter().any(|l| l.to_lowercase() == lower) {
                labels.push(label.to_string());
            }
        }
        ProcessedValue::Labels(labels)
    }
}

/// Keeps the leftmost project reference.
#[derive(Debug, Default)]
pub struct ProjectProcessor;

impl Processor for ProjectProcessor {
    fn name(&self) -> &'static str {
        PROJECT_PROCESSOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Project
    }

    fn process(&self, matches: &[ExtractedMatch], _ctx: &ExtractionContext) -> ProcessedValue {
        let project = matches.iter().find_map(|m| match &m.value {
            MatchValue::Project(p) if !p.trim().is_empty() => Some(p.trim().to_string()),
            _ => None,
        });
        ProcessedValue::Project(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Locale;
    use chrono::NaiveDate;

    fn ctx() -> ExtractionContext {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 10)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid reference");
        ExtractionContext::new(Locale::English, reference)
    }

    fn priority(raw: &str, p: i64) -> ExtractedMatch {
        let text = format!("x {raw}");
        ExtractedMatch::new("priority-extractor", &text, 2, text.len(), MatchValue::Priority(p))
    }

    fn label(raw: &str) -> ExtractedMatch {
        let text = format!("#{raw}");
        ExtractedMatch::new("label-extractor", &text, 0, text.len(), MatchValue::Label(raw.to_string()))
    }

    #[test]
    fn test_priority_is_clamped() {
        let p = PriorityProcessor;
        assert_eq!(p.process(&[priority("!0", 0)], &ctx()), ProcessedValue::Priority(Some(1)));
        assert_eq!(p.process(&[priority("!42", 42)], &ctx()), ProcessedValue::Priority(Some(9)));
        assert_eq!(p.process(&[priority("!3", 3)], &ctx()), ProcessedValue::Priority(Some(3)));
        assert_eq!(p.process(&[], &ctx()), ProcessedValue::Priority(None));
    }

    #[test]
    fn test_first_priority_wins() {
        let p = PriorityProcessor;
        let matches = [priority("!2", 2), priority("!7", 7)];
        assert_eq!(p.process(&matches, &ctx()), ProcessedValue::Priority(Some(2)));
    }

    #[test]
    fn test_labels_are_deduplicated() {
        let p = LabelProcessor;
        let matches = [label("work"), label("Home"), label("WORK"), label("home")];
        assert_eq!(
            p.process(&matches, &ctx()),
            ProcessedValue::Labels(vec!["work".to_string(), "Home".to_string()])
        );
    }

    #[test]
    fn test_far_dates_are_rejected() {
        let p = DateProcessor;
        let far = NaiveDate::from_ymd_opt(2300, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        let near = NaiveDate::from_ymd_opt(2025, 3, 11)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        let text = "2300-01-01 2025-03-11";
        let matches = [
            ExtractedMatch::new("date-extractor", text, 0, 10, MatchValue::Date(far)),
            ExtractedMatch::new("date-extractor", text, 11, 21, MatchValue::Date(near)),
        ];
        assert_eq!(p.process(&matches, &ctx()), ProcessedValue::Date(Some(near)));
        assert_eq!(p.process(&matches[..1], &ctx()), ProcessedValue::Date(None));
    }
}
