// Crate root library declaration and module exports.
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod parser;

pub use error::ConfigError;
pub use model::{ExtractedMatch, ExtractionContext, Locale, MatchKind, MatchValue, ParseResult};
pub use parser::CaptureParser;
pub use parser::locale::{LocaleConfig, LocaleRegistry, PipelineOverrides};
pub use parser::tag::{PatternFlags, TagPattern, TagPatternOptions, build_tag_pattern};

use once_cell::sync::Lazy;

static DEFAULT_PARSER: Lazy<Option<CaptureParser>> = Lazy::new(|| {
    LocaleRegistry::with_defaults()
        .map(CaptureParser::new)
        .map_err(|e| log::error!("Failed to build default capture pipelines: {}", e))
        .ok()
});

/// Parses `text` with the default pipeline of `ctx.locale`.
///
/// Use a [`CaptureParser`] built from a [`LocaleRegistry`] to apply
/// pipeline overrides.
pub fn parse(text: &str, ctx: &ExtractionContext) -> ParseResult {
    match DEFAULT_PARSER.as_ref() {
        Some(parser) => parser.parse(text, ctx),
        None => ParseResult {
            cleaned_title: text.split_whitespace().collect::<Vec<_>>().join(" "),
            ..ParseResult::default()
        },
    }
}
