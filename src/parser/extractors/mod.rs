// File: ./src/parser/extractors/mod.rs
//! Extractors: independent scanners, one per entity kind.
//!
//! Every extractor reads the original input once, left to right, and returns
//! its candidate matches in text order. Extractors never look at each other's
//! output; conflicts between them are settled by the orchestrator.

pub mod en;
pub mod tags;
pub mod zh;

use crate::model::{ExtractedMatch, ExtractionContext, MatchKind};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

pub use en::{EnglishDateExtractor, EnglishPriorityExtractor};
pub use tags::TagExtractor;
pub use zh::{ChineseDateExtractor, ChinesePriorityExtractor};

pub const DATE_EXTRACTOR: &str = "date-extractor";
pub const PRIORITY_EXTRACTOR: &str = "priority-extractor";
pub const PROJECT_EXTRACTOR: &str = "project-extractor";
pub const LABEL_EXTRACTOR: &str = "label-extractor";

pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Unique within a pipeline; used by overrides and as the match tag.
    fn name(&self) -> &'static str;

    fn kind(&self) -> MatchKind;

    /// Never fails: "nothing found" is an empty list.
    fn extract(&self, text: &str, ctx: &ExtractionContext) -> Vec<ExtractedMatch>;
}

pub(crate) fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// First `target` strictly after `from`.
pub(crate) fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let mut d = from.checked_add_days(Days::new(1))?;
    while d.weekday() != target {
        d = d.checked_add_days(Days::new(1))?;
    }
    Some(d)
}

/// `from` shifted by a signed number of calendar days.
pub(crate) fn shift_days(from: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        from.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        from.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}
