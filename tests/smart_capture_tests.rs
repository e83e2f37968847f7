use chrono::{NaiveDate, NaiveDateTime};
use quickcap::model::SyntaxType;
use quickcap::parser::locale::EnglishConfig;
use quickcap::{
    CaptureParser, ExtractionContext, Locale, LocaleConfig, LocaleRegistry, ParseResult,
    PipelineOverrides,
};
use std::collections::HashMap;
use std::sync::Arc;

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 12)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn en_ctx() -> ExtractionContext {
    ExtractionContext::new(Locale::English, reference())
}

fn zh_ctx() -> ExtractionContext {
    ExtractionContext::new(Locale::Chinese, reference())
}

fn default_parser() -> CaptureParser {
    CaptureParser::new(LocaleRegistry::with_defaults().unwrap())
}

fn parser_with(locale: Locale, overrides: PipelineOverrides) -> CaptureParser {
    let mut map = HashMap::new();
    map.insert(locale, overrides);
    CaptureParser::new(LocaleRegistry::new(&map).unwrap())
}

fn en(text: &str) -> ParseResult {
    default_parser().parse(text, &en_ctx())
}

fn zh(text: &str) -> ParseResult {
    default_parser().parse(text, &zh_ctx())
}

#[test]
fn test_full_english_capture() {
    let r = en("Finish report #work tomorrow !1");
    assert_eq!(r.cleaned_title, "Finish report");
    assert_eq!(r.labels, vec!["work"]);
    assert_eq!(r.priority, Some(1));
    assert_eq!(r.due_date, Some(day(2025, 3, 13)));
    assert_eq!(r.project_ref, None);
}

#[test]
fn test_plain_text_is_untouched() {
    let r = en("  Water   the plants  ");
    assert_eq!(r.cleaned_title, "Water the plants");
    assert!(r.is_empty());

    let r = en("");
    assert_eq!(r.cleaned_title, "");
    assert!(r.is_empty());
}

#[test]
fn test_email_is_not_a_project() {
    let r = en("Send invoice to bob@example.com");
    assert_eq!(r.project_ref, None);
    assert_eq!(r.cleaned_title, "Send invoice to bob@example.com");
}

#[test]
fn test_open_project_reference() {
    let r = en("Plan sprint @Backend");
    assert_eq!(r.project_ref.as_deref(), Some("Backend"));
    assert_eq!(r.cleaned_title, "Plan sprint");
}

#[test]
fn test_project_candidates_allow_spaces() {
    let ctx = en_ctx().with_projects(["Work", "Work Tasks"]);
    let r = default_parser().parse("Plan @Work Tasks review", &ctx);
    assert_eq!(r.project_ref.as_deref(), Some("Work Tasks"));
    assert_eq!(r.cleaned_title, "Plan review");
}

#[test]
fn test_project_candidates_use_canonical_spelling() {
    let ctx = en_ctx().with_projects(["Backend"]);
    let r = default_parser().parse("Deploy @backend", &ctx);
    assert_eq!(r.project_ref.as_deref(), Some("Backend"));
}

#[test]
fn test_first_project_wins() {
    let r = en("Sync @alpha then @beta");
    assert_eq!(r.project_ref.as_deref(), Some("alpha"));
    assert_eq!(r.cleaned_title, "Sync then");
}

#[test]
fn test_label_candidates_restrict_matches() {
    let ctx = en_ctx().with_labels(["home"]);
    let r = default_parser().parse("Fix #sink at #home", &ctx);
    assert_eq!(r.labels, vec!["home"]);
    assert_eq!(r.cleaned_title, "Fix #sink at");
}

#[test]
fn test_labels_keep_order_and_dedupe() {
    let r = en("#b stuff #a #B");
    assert_eq!(r.labels, vec!["b", "a"]);
    assert_eq!(r.cleaned_title, "stuff");
}

#[test]
fn test_pipeline_order_decides_overlaps() {
    // Labels run before dates by default.
    let r = en("#today");
    assert_eq!(r.labels, vec!["today"]);
    assert_eq!(r.due_date, None);
    assert_eq!(r.cleaned_title, "");

    let parser = parser_with(
        Locale::English,
        PipelineOverrides::default().extractor_order(["date-extractor"]),
    );
    let r = parser.parse("#today", &en_ctx());
    assert_eq!(r.due_date, Some(day(2025, 3, 12)));
    assert!(r.labels.is_empty());
    assert_eq!(r.cleaned_title, "#");
}

#[test]
fn test_priority_words_and_clamping() {
    assert_eq!(en("Ship it !high").priority, Some(1));
    assert_eq!(en("Ship it !medium").priority, Some(5));
    assert_eq!(en("Ship it !0").priority, Some(1));
    assert_eq!(en("Ship it !12").priority, Some(9));
    assert_eq!(en("Ship it !12").cleaned_title, "Ship it");
}

#[test]
fn test_disabled_extractor_leaves_text_in_title() {
    let parser = parser_with(
        Locale::English,
        PipelineOverrides::default().disable_extractors(["priority-extractor"]),
    );
    let r = parser.parse("Task !1", &en_ctx());
    assert_eq!(r.priority, None);
    assert_eq!(r.cleaned_title, "Task !1");
}

#[test]
fn test_disabled_processor_leaves_text_in_title() {
    let parser = parser_with(
        Locale::English,
        PipelineOverrides::default().disable_processors(["label-processor"]),
    );
    let r = parser.parse("Call #home tomorrow", &en_ctx());
    assert!(r.labels.is_empty());
    assert_eq!(r.due_date, Some(day(2025, 3, 13)));
    assert_eq!(r.cleaned_title, "Call #home");
}

#[test]
fn test_first_date_wins_and_all_dates_are_removed() {
    let r = en("today or tomorrow");
    assert_eq!(r.due_date, Some(day(2025, 3, 12)));
    assert_eq!(r.cleaned_title, "or");
}

#[test]
fn test_date_with_time() {
    let r = en("Dentist next friday at 3pm");
    let expected = NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(15, 0, 0)
        .unwrap();
    assert_eq!(r.due_date, Some(expected));
    assert_eq!(r.cleaned_title, "Dentist");
}

#[test]
fn test_chinese_capture() {
    let r = zh("完成 #项目A 明天");
    assert_eq!(r.labels, vec!["项目A"]);
    assert_eq!(r.due_date, Some(day(2025, 3, 13)));
    assert_eq!(r.cleaned_title, "完成");
}

#[test]
fn test_chinese_full_width_markers() {
    let r = zh("明天开会 ！2 ＃工作");
    assert_eq!(r.due_date, Some(day(2025, 3, 13)));
    assert_eq!(r.priority, Some(2));
    assert_eq!(r.labels, vec!["工作"]);
    assert_eq!(r.cleaned_title, "开会");
}

#[test]
fn test_chinese_project_and_weekday() {
    let r = zh("周五前提交 @财务 ！高");
    assert_eq!(r.due_date, Some(day(2025, 3, 14)));
    assert_eq!(r.project_ref.as_deref(), Some("财务"));
    assert_eq!(r.priority, Some(1));
    assert_eq!(r.cleaned_title, "前提交");
}

#[test]
fn test_chinese_exclamation_is_not_a_priority() {
    let r = zh("太好了！中午开会");
    assert_eq!(r.priority, None);
    assert_eq!(r.cleaned_title, "太好了！中午开会");

    let r = zh("完成！1234abc");
    assert_eq!(r.priority, None);
    assert_eq!(r.cleaned_title, "完成！1234abc");
}

#[test]
fn test_removal_does_not_reform_a_match() {
    let parser = default_parser();
    let matches = parser.extract("今今天天", &zh_ctx());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].raw_text, "今天");

    let r = parser.parse("今今天天", &zh_ctx());
    assert_eq!(r.due_date, Some(day(2025, 3, 12)));
    assert_eq!(r.cleaned_title, "今 天");
}

#[test]
fn test_lookalike_of_a_match_is_removed_from_title() {
    // "x#a" is glued and does not match, but "#a" is a label elsewhere.
    let r = en("x#a #a");
    assert_eq!(r.labels, vec!["a"]);
    assert!(!r.cleaned_title.contains("#a"));
    assert_eq!(r.cleaned_title, "x");
}

#[test]
fn test_english_words_are_not_dates_in_chinese() {
    let r = zh("tomorrow 开会");
    assert_eq!(r.due_date, None);
    assert_eq!(r.cleaned_title, "tomorrow 开会");
}

#[test]
fn test_parse_is_idempotent() {
    let parser = default_parser();
    for (text, ctx) in [
        ("Finish report #work tomorrow !1", en_ctx()),
        ("Plan @Backend in 3 days #a #b", en_ctx()),
        ("明天开会 ！2 ＃工作", zh_ctx()),
    ] {
        let first = parser.parse(text, &ctx);
        let second = parser.parse(text, &ctx);
        assert_eq!(first, second);
        // The cleaned title has nothing left to extract.
        let again = parser.parse(&first.cleaned_title, &ctx);
        assert_eq!(again.cleaned_title, first.cleaned_title);
        assert!(again.is_empty(), "{:?}", again);
    }
}

#[test]
fn test_tokens_cover_the_input() {
    let parser = default_parser();
    let text = "Call #home tomorrow !2 @family";
    let tokens = parser.tokenize(text, &en_ctx());

    assert_eq!(tokens.first().unwrap().start, 0);
    assert_eq!(tokens.last().unwrap().end, text.len());
    for pair in tokens.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }

    let kinds: Vec<(SyntaxType, &str)> =
        tokens.iter().map(|t| (t.kind, &text[t.start..t.end])).collect();
    assert!(kinds.contains(&(SyntaxType::Label, "#home")));
    assert!(kinds.contains(&(SyntaxType::DueDate, "tomorrow")));
    assert!(kinds.contains(&(SyntaxType::Priority, "!2")));
    assert!(kinds.contains(&(SyntaxType::Project, "@family")));
}

#[test]
fn test_capture_string_round_trip() {
    let parser = default_parser();
    let first = parser.parse("Finish report #work tomorrow !1 @office", &en_ctx());
    let rendered = first.to_capture_string();
    assert_eq!(rendered, "Finish report #work @office !1 2025-03-13");
    assert_eq!(parser.parse(&rendered, &en_ctx()), first);
}

#[test]
fn test_missing_locale_falls_back_to_title() {
    let english: Box<dyn LocaleConfig> = Box::new(EnglishConfig::new(&PipelineOverrides::default()).unwrap());
    let parser = CaptureParser::new(LocaleRegistry::from_configs(vec![english]));
    let r = parser.parse("明天  开会", &zh_ctx());
    assert_eq!(r.cleaned_title, "明天 开会");
    assert!(r.is_empty());
    assert!(parser.extract("明天", &zh_ctx()).is_empty());
}

#[test]
fn test_shared_registry_across_threads() {
    let registry = Arc::new(LocaleRegistry::with_defaults().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = CaptureParser::from_shared(Arc::clone(&registry));
            std::thread::spawn(move || parser.parse("明天开会 ！2", &zh_ctx()))
        })
        .collect();
    for handle in handles {
        let r = handle.join().unwrap();
        assert_eq!(r.cleaned_title, "开会");
        assert_eq!(r.priority, Some(2));
    }

    let parser = CaptureParser::from_shared(registry);
    assert_eq!(parser.registry().locales(), vec![Locale::English, Locale::Chinese]);
}

#[test]
fn test_convenience_parse() {
    let r = quickcap::parse("Buy milk #errands", &en_ctx());
    assert_eq!(r.cleaned_title, "Buy milk");
    assert_eq!(r.labels, vec!["errands"]);
}

#[test]
fn test_result_serializes_to_json() {
    let r = en("Buy milk #errands !3");
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["cleaned_title"], "Buy milk");
    assert_eq!(json["priority"], 3);
    assert_eq!(json["labels"][0], "errands");
    assert!(json["due_date"].is_null());
}
