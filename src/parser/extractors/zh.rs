// File: ./src/parser/extractors/zh.rs
// Chinese vocabulary: relative date expressions and priority markers.
//
// Chinese text is written without spaces, so none of these patterns rely on
// word boundaries: "今天开会" yields the date "今天" followed by plain text.
use super::{DATE_EXTRACTOR, Extractor, PRIORITY_EXTRACTOR, next_weekday, shift_days, start_of_day};
use crate::model::{ExtractedMatch, ExtractionContext, MatchKind, MatchValue};
use chrono::{Datelike, Months, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const WEEK_WORDS: &str = "周|星期|礼拜";
const DAY_CHARS: &str = "一二三四五六日天";
const NUMERALS: &str = "零一二两三四五六七八九十百";

static DATE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?P<iso>[0-9]{{4}}-[0-9]{{1,2}}-[0-9]{{1,2}})|(?P<month>[0-9]{{1,2}}|[{NUMERALS}]{{1,3}})月(?P<day>[0-9]{{1,2}}|[{NUMERALS}]{{1,3}})[日号]|(?P<rel>大后天|后天|明天|明日|今天|今日|今晚|昨天)|下个?(?:{WEEK_WORDS})(?P<next_wd>[{DAY_CHARS}])|(?P<next_week>下个?(?:{WEEK_WORDS}))|(?P<next_month>下个?月)|(?:{WEEK_WORDS})(?P<wd>[{DAY_CHARS}])|(?P<amount>[0-9]{{1,4}}|[{NUMERALS}]+)(?P<unit>天|周|个星期|个礼拜|个月|年)后"
    );
    Regex::new(&pattern).expect("Chinese date pattern is valid")
});

// The level must end the token: "！中午" is an exclamation followed by text.
static PRIORITY_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[!！](?P<level>[0-9]+|高优先级|中优先级|低优先级|高|中|低)(?:[^\p{L}\p{M}\p{N}_]|$)")
        .expect("Chinese priority pattern is valid")
});

/// Resolves Chinese date expressions at extraction time.
///
/// Values are always the start of the resolved day: `今天` is the reference
/// day, `明天` the next one, `下周` seven days later, `下周三` the Wednesday
/// of next week, `周五` the next Friday, `3天后` three days later and
/// `12月25日` the next 25 December.
#[derive(Debug, Default)]
pub struct ChineseDateExtractor;

impl ChineseDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ChineseDateExtractor {
    fn name(&self) -> &'static str {
        DATE_EXTRACTOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Date
    }

    fn extract(&self, text: &str, ctx: &ExtractionContext) -> Vec<ExtractedMatch> {
        let today = ctx.reference.date();
        DATE_PHRASE
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let date = resolve_date(&caps, today)?;
                Some(ExtractedMatch::new(
                    DATE_EXTRACTOR,
                    text,
                    whole.start(),
                    whole.end(),
                    MatchValue::Date(start_of_day(date)),
                ))
            })
            .collect()
    }
}

fn resolve_date(caps: &Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(rel) = caps.name("rel") {
        let offset = match rel.as_str() {
            "今天" | "今日" | "今晚" => 0,
            "明天" | "明日" => 1,
            "后天" => 2,
            "大后天" => 3,
            "昨天" => -1,
            _ => return None,
        };
        return shift_days(today, offset);
    }
    if let Some(wd) = caps.name("next_wd") {
        // Monday-based weeks: the given day of the week after this one.
        let target = parse_weekday(wd.as_str())?;
        let monday = shift_days(today, -i64::from(today.weekday().num_days_from_monday()))?;
        return shift_days(monday, 7 + i64::from(target.num_days_from_monday()));
    }
    if caps.name("next_week").is_some() {
        return shift_days(today, 7);
    }
    if caps.name("next_month").is_some() {
        return today.checked_add_months(Months::new(1));
    }
    if let Some(wd) = caps.name("wd") {
        return next_weekday(today, parse_weekday(wd.as_str())?);
    }
    if let (Some(amount), Some(unit)) = (caps.name("amount"), caps.name("unit")) {
        let n = parse_chinese_number(amount.as_str())?;
        return match unit.as_str() {
            "天" => shift_days(today, i64::from(n)),
            "周" | "个星期" | "个礼拜" => shift_days(today, i64::from(n) * 7),
            "个月" => today.checked_add_months(Months::new(n)),
            _ => today.checked_add_months(Months::new(n.checked_mul(12)?)),
        };
    }
    if let (Some(month), Some(day)) = (caps.name("month"), caps.name("day")) {
        let month = parse_chinese_number(month.as_str())?;
        let day = parse_chinese_number(day.as_str())?;
        // Next occurrence on or after today; 2月29日 may be years away.
        return (0..=8).find_map(|n| {
            NaiveDate::from_ymd_opt(today.year().checked_add(n)?, month, day).filter(|d| *d >= today)
        });
    }
    if let Some(iso) = caps.name("iso") {
        return NaiveDate::parse_from_str(iso.as_str(), "%Y-%m-%d").ok();
    }
    None
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "一" => Some(Weekday::Mon),
        "二" => Some(Weekday::Tue),
        "三" => Some(Weekday::Wed),
        "四" => Some(Weekday::Thu),
        "五" => Some(Weekday::Fri),
        "六" => Some(Weekday::Sat),
        "日" | "天" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parses Arabic digits or Chinese numerals up to the hundreds ("二十三", "两", "一百零五").
pub fn parse_chinese_number(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    if s.is_empty() {
        return None;
    }
    let mut total = 0u32;
    let mut current = 0u32;
    for c in s.chars() {
        match c {
            '零' => current = 0,
            '一' => current = 1,
            '二' | '两' => current = 2,
            '三' => current = 3,
            '四' => current = 4,
            '五' => current = 5,
            '六' => current = 6,
            '七' => current = 7,
            '八' => current = 8,
            '九' => current = 9,
            '十' => {
                total = total.saturating_add(current.max(1) * 10);
                current = 0;
            }
            '百' => {
                total = total.saturating_add(current.max(1) * 100);
                current = 0;
            }
            _ => return None,
        }
    }
    Some(total.saturating_add(current))
}

/// `!1` / `！1` digits, and `！高` / `！中` / `！低` (optionally `高优先级` etc.).
#[derive(Debug, Default)]
pub struct ChinesePriorityExtractor;

impl ChinesePriorityExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ChinesePriorityExtractor {
    fn name(&self) -> &'static str {
        PRIORITY_EXTRACTOR
    }

    fn kind(&self) -> MatchKind {
        MatchKind::Priority
    }

    fn extract(&self, text: &str, _ctx: &ExtractionContext) -> Vec<ExtractedMatch> {
        let mut matches = Vec::new();
        // The terminator is consumed by the regex; resume at the level end so
        // it can open the next mark ("！1！2").
        let mut pos = 0;
        while pos <= text.len() {
            let Some(caps) = PRIORITY_MARK.captures_at(text, pos) else {
                break;
            };
            let (Some(whole), Some(level)) = (caps.get(0), caps.name("level")) else {
                break;
            };
            pos = level.end();

            // A mark glued to Latin text ("abc!1") is not a priority; CJK may touch it.
            let glued = text[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
            if glued {
                continue;
            }
            let value = match level.as_str() {
                "高" | "高优先级" => 1,
                "中" | "中优先级" => 5,
                "低" | "低优先级" => 9,
                digits => match digits.parse::<i64>() {
                    Ok(n) => n,
                    Err(_) => continue,
                },
            };
            matches.push(ExtractedMatch::new(
                PRIORITY_EXTRACTOR,
                text,
                whole.start(),
                level.end(),
                MatchValue::Priority(value),
            ));
        }
        matches
    }
}
