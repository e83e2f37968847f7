//! Property-based tests for the capture parser
//!
//! Whatever the input, parsing must not panic, surviving matches must be
//! disjoint valid spans in text order, the cleaned title must not contain
//! any of them, and the highlighter must cover the input without gaps.

use chrono::NaiveDate;
use proptest::prelude::*;
use quickcap::{CaptureParser, ExtractionContext, Locale, LocaleRegistry};

fn parser() -> CaptureParser {
    CaptureParser::new(LocaleRegistry::with_defaults().unwrap())
}

fn ctx(locale: Locale) -> ExtractionContext {
    let reference = NaiveDate::from_ymd_opt(2025, 3, 12)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    ExtractionContext::new(locale, reference)
}

fn locale_strategy() -> impl Strategy<Value = Locale> {
    prop_oneof![Just(Locale::English), Just(Locale::Chinese)]
}

/// Words that exercise every extractor, mixed with filler.
fn capture_word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Filler
        "[a-zA-Z]{1,8}",
        "[开会报告整理文件]{1,4}",
        // Tags
        "[#@＃＠][a-z项目工作]{1,6}",
        "[!！](1|5|9|12|high|low|高|中|低)",
        // Dates
        Just("today".to_string()),
        Just("tomorrow at 5pm".to_string()),
        Just("next friday".to_string()),
        Just("in 3 days".to_string()),
        Just("2025-04-01".to_string()),
        Just("明天".to_string()),
        Just("下周一".to_string()),
        Just("三天后".to_string()),
        Just("12月25日".to_string()),
        Just("今今天天".to_string()),
        Just("太好了！中午".to_string()),
        // Noise
        Just("bob@example.com".to_string()),
        "[ ,.()#@!]{1,3}",
    ]
}

fn capture_line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(capture_word_strategy(), 0..8).prop_map(|words| words.join(" "))
}

fn check_invariants(text: &str, locale: Locale) -> Result<(), TestCaseError> {
    let parser = parser();
    let ctx = ctx(locale);

    let matches = parser.extract(text, &ctx);
    for m in &matches {
        prop_assert!(m.start < m.end && m.end <= text.len());
        prop_assert!(text.is_char_boundary(m.start) && text.is_char_boundary(m.end));
        prop_assert_eq!(&text[m.start..m.end], m.raw_text.as_str());
    }
    for pair in matches.windows(2) {
        prop_assert!(pair[0].end <= pair[1].start, "overlap: {:?}", pair);
    }

    let tokens = parser.tokenize(text, &ctx);
    let mut cursor = 0;
    for token in &tokens {
        prop_assert_eq!(token.start, cursor);
        prop_assert!(token.end > token.start);
        cursor = token.end;
    }
    prop_assert_eq!(cursor, text.len());

    let first = parser.parse(text, &ctx);
    let second = parser.parse(text, &ctx);
    prop_assert_eq!(&first, &second);

    let title = &first.cleaned_title;
    for m in &matches {
        prop_assert!(
            !title.contains(m.raw_text.as_str()),
            "title {:?} still holds {:?}",
            title,
            m.raw_text
        );
    }
    prop_assert_eq!(title.trim(), title.as_str());
    prop_assert!(!title.contains("  "));
    if let Some(p) = first.priority {
        prop_assert!((1..=9).contains(&p));
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_capture_lines_keep_invariants(text in capture_line_strategy(), locale in locale_strategy()) {
        check_invariants(&text, locale)?;
    }

    #[test]
    fn test_arbitrary_text_never_panics(text in "\\PC{0,40}", locale in locale_strategy()) {
        check_invariants(&text, locale)?;
    }

    #[test]
    fn test_text_without_markers_is_only_normalized(text in "[a-z ]{0,30}") {
        // No digits, no markers; only date keywords could match.
        let result = parser().parse(&text, &ctx(Locale::Chinese));
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        prop_assert_eq!(&result.cleaned_title, &collapsed);
        prop_assert!(result.is_empty());
    }
}
