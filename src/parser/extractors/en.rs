// File: ./src/parser/extractors/en.rs
// English vocabulary: date phrases and priority markers.
use super::{DATE_EXTRACTOR, Extractor, PRIORITY_EXTRACTOR, next_weekday, shift_days, start_of_day};
use crate::error::ConfigError;
use crate::model::{ExtractedMatch, ExtractionContext, MatchKind, MatchValue};
use crate::parser::tag::{TagPattern, TagPatternOptions, build_tag_pattern};
use chrono::{Months, NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};

const WEEKDAYS: &str = "monday|mon|tuesday|tues|tue|wednesday|wed|thursday|thurs|thur|thu|friday|fri|saturday|sat|sunday|sun";
const NUMBERS: &str = r"\d{1,4}|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|an|a";

static DATE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    let phrase = format!(
        r"(?P<after_tomorrow>day\s+after\s+tomorrow)|(?P<today>today|tonight)|(?P<tomorrow>tomorrow|tmr)|(?P<yesterday>yesterday)|next\s+(?P<next_unit>week|month|year)|next\s+(?P<next_wd>{WEEKDAYS})|on\s+(?P<on_wd>{WEEKDAYS})|in\s+(?P<amount>{NUMBERS})\s+(?P<unit>days?|weeks?|months?|years?)|(?P<iso>\d{{4}}-\d{{2}}-\d{{2}})"
    );
    let time = r"(?P<h12>\d{1,2})(?::(?P<m12>\d{2}))?\s?(?P<ampm>am|pm)|(?P<h24>\d{1,2}):(?P<m24>\d{2})";
    RegexBuilder::new(&format!(r"\b(?P<phrase>{phrase})\b(?:\s+(?:at\s+)?(?:{time})\b)?"))
        .case_insensitive(true)
        .unicode(true)
        .build()
        .expect("English date pattern is valid")
});

/// Recognizes English date phrases and resolves them against the reference date.
///
/// Supported: `today`, `tonight`, `tomorrow`, `day after tomorrow`,
/// `yesterday`, `next week|month|year`, `next friday`, `on friday`,
/// `in 3 days`, `in two weeks` and ISO `2025-01-31`. A trailing time
/// (`5pm`, `at 17:30`) is folded into the value; otherwise the value is the
/// start of the day.
#[derive(Debug, Default)]
pub struct EnglishDateExtractor;

impl EnglishDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for EnglishDateExtractor {
    fn name(&self) -> &'static str {
        DATE_EXTRACTOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Date
    }

    fn extract(&self, text: &str, ctx: &ExtractionContext) -> Vec<ExtractedMatch> {
        let today = ctx.reference.date();
        let mut matches = Vec::new();

        for caps in DATE_PHRASE.captures_iter(text) {
            let (Some(whole), Some(phrase)) = (caps.get(0), caps.name("phrase")) else {
                continue;
            };
            let Some(date) = resolve_date(&caps, today) else {
                log::debug!("date-extractor: '{}' does not resolve to a date", phrase.as_str());
                continue;
            };
            let (value, end) = match parse_time(&caps) {
                Some(t) => (date.and_time(t), whole.end()),
                None => (start_of_day(date), phrase.end()),
            };
            matches.push(ExtractedMatch::new(
                DATE_EXTRACTOR,
                text,
                phrase.start(),
                end,
                MatchValue::Date(value),
            ));
        }
        matches
    }
}

fn resolve_date(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    if caps.name("today").is_some() {
        return Some(today);
    }
    if caps.name("tomorrow").is_some() {
        return shift_days(today, 1);
    }
    if caps.name("after_tomorrow").is_some() {
        return shift_days(today, 2);
    }
    if caps.name("yesterday").is_some() {
        return shift_days(today, -1);
    }
    if let Some(unit) = caps.name("next_unit") {
        return match unit.as_str().to_lowercase().as_str() {
            "week" => shift_days(today, 7),
            "month" => today.checked_add_months(Months::new(1)),
            _ => today.checked_add_months(Months::new(12)),
        };
    }
    if let Some(wd) = caps.name("next_wd").or_else(|| caps.name("on_wd")) {
        return next_weekday(today, parse_weekday(wd.as_str())?);
    }
    if let (Some(amount), Some(unit)) = (caps.name("amount"), caps.name("unit")) {
        let n = parse_english_number(amount.as_str())?;
        let unit = unit.as_str().to_lowercase();
        return if unit.starts_with("day") {
            shift_days(today, i64::from(n))
        } else if unit.starts_with("week") {
            shift_days(today, i64::from(n) * 7)
        } else if unit.starts_with("month") {
            today.checked_add_months(Months::new(n))
        } else {
            today.checked_add_months(Months::new(n.checked_mul(12)?))
        };
    }
    if let Some(iso) = caps.name("iso") {
        return NaiveDate::parse_from_str(iso.as_str(), "%Y-%m-%d").ok();
    }
    None
}

fn parse_time(caps: &Captures<'_>) -> Option<NaiveTime> {
    if let (Some(h), Some(ampm)) = (caps.name("h12"), caps.name("ampm")) {
        let h = h.as_str().parse::<u32>().ok()?;
        let m = match caps.name("m12") {
            Some(m) => m.as_str().parse::<u32>().ok()?,
            None => 0,
        };
        if !(1..=12).contains(&h) || m > 59 {
            return None;
        }
        let is_pm = ampm.as_str().eq_ignore_ascii_case("pm");
        let h_24 = match (h, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        return NaiveTime::from_hms_opt(h_24, m, 0);
    }
    if let (Some(h), Some(m)) = (caps.name("h24"), caps.name("m24")) {
        return NaiveTime::from_hms_opt(h.as_str().parse().ok()?, m.as_str().parse().ok()?, 0);
    }
    None
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_english_number(s: &str) -> Option<u32> {
    match s.to_lowercase().as_str() {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        other => other.parse::<u32>().ok(),
    }
}

/// `!1` .. `!9` and `!high`, `!medium`, `!low`.
#[derive(Debug)]
pub struct EnglishPriorityExtractor {
    pattern: TagPattern,
}

impl EnglishPriorityExtractor {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: build_tag_pattern(TagPatternOptions::new('!'))?,
        })
    }
}

fn priority_word(body: &str) -> Option<i64> {
    if body.chars().all(|c| c.is_ascii_digit()) {
        return body.parse::<i64>().ok();
    }
    match body.to_lowercase().as_str() {
        "high" | "urgent" => Some(1),
        "medium" | "normal" => Some(5),
        "low" => Some(9),
        _ => None,
    }
}

impl Extractor for EnglishPriorityExtractor {
    fn name(&self) -> &'static str {
        PRIORITY_EXTRACTOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Priority
    }

    fn extract(&self, text: &str, _ctx: &ExtractionContext) -> Vec<ExtractedMatch> {
        self.pattern
            .find_iter(text)
            .into_iter()
            .filter_map(|tag| {
                let level = priority_word(&tag.body)?;
                Some(ExtractedMatch::new(
                    PRIORITY_EXTRACTOR,
                    text,
                    tag.start,
                    tag.end,
                    MatchValue::Priority(level),
                ))
            })
            .collect()
    }
}
