// File: ./src/parser/mod.rs
//! The capture parser: one line of free text in, one [`ParseResult`] out.
//!
//! ```text
//! text ─┬─ extractor 1 ─┐
//!       ├─ extractor 2 ─┼─ sort by start ─ resolve overlaps ─ processors ─ ParseResult
//!       └─ extractor n ─┘
//! ```
//!
//! Every extractor scans the untouched input. Overlapping candidates are
//! settled by pipeline order (earlier extractor wins), then by the leftmost
//! start, then by the longest span. The cleaned title is the input with every
//! surviving span cut out and whitespace collapsed.

pub mod extractors;
pub mod locale;
pub mod processors;
pub mod tag;

use crate::model::{
    ExtractedMatch, ExtractionContext, MatchKind, ParseResult, SyntaxToken, SyntaxType,
};
use locale::{LocaleConfig, LocaleRegistry};
use processors::ProcessedValue;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CaptureParser {
    registry: Arc<LocaleRegistry>,
}

impl CaptureParser {
    pub fn new(registry: LocaleRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_shared(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Parses `text` with the pipeline of `ctx.locale`.
    ///
    /// Never fails: input without entities yields an empty result whose
    /// title is the whitespace-normalized input.
    pub fn parse(&self, text: &str, ctx: &ExtractionContext) -> ParseResult {
        let Some(config) = self.registry.get(ctx.locale) else {
            log::warn!("No capture pipeline for locale '{}'", ctx.locale);
            return ParseResult {
                cleaned_title: collapse_whitespace(text),
                ..ParseResult::default()
            };
        };

        let matches = self.resolve_matches(config, text, ctx);
        let mut result = ParseResult {
            cleaned_title: strip_spans(text, &matches),
            ..ParseResult::default()
        };

        for processor in config.get_processors() {
            let of_kind: Vec<ExtractedMatch> = matches
                .iter()
                .filter(|m| m.kind == processor.kind())
                .cloned()
                .collect();
            if of_kind.is_empty() {
                continue;
            }
            match processor.process(&of_kind, ctx) {
                ProcessedValue::Date(d) => result.due_date = d,
                ProcessedValue::Priority(p) => result.priority = p,
                ProcessedValue::Labels(l) => result.labels = l,
                ProcessedValue::Project(p) => result.project_ref = p,
            }
        }
        result
    }

    /// The surviving matches of a parse, in text order.
    pub fn extract(&self, text: &str, ctx: &ExtractionContext) -> Vec<ExtractedMatch> {
        match self.registry.get(ctx.locale) {
            Some(config) => self.resolve_matches(config, text, ctx),
            None => Vec::new(),
        }
    }

    /// Splits `text` into contiguous highlighted spans covering the whole input.
    pub fn tokenize(&self, text: &str, ctx: &ExtractionContext) -> Vec<SyntaxToken> {
        let mut tokens = Vec::new();
        let mut cursor = 0;
        for m in self.extract(text, ctx) {
            if m.start > cursor {
                tokens.push(SyntaxToken {
                    kind: SyntaxType::Text,
                    start: cursor,
                    end: m.start,
                });
            }
            tokens.push(SyntaxToken {
                kind: syntax_type(m.kind),
                start: m.start,
                end: m.end,
            });
            cursor = m.end;
        }
        if cursor < text.len() {
            tokens.push(SyntaxToken {
                kind: SyntaxType::Text,
                start: cursor,
                end: text.len(),
            });
        }
        tokens
    }

    fn resolve_matches(
        &self,
        config: &dyn LocaleConfig,
        text: &str,
        ctx: &ExtractionContext,
    ) -> Vec<ExtractedMatch> {
        let processed_kinds: HashSet<MatchKind> =
            config.get_processors().iter().map(|p| p.kind()).collect();

        // (pipeline rank, match)
        let mut candidates: Vec<(usize, ExtractedMatch)> = Vec::new();
        for (rank, extractor) in config.get_extractors().iter().enumerate() {
            if !processed_kinds.contains(&extractor.kind()) {
                continue;
            }
            for m in extractor.extract(text, ctx) {
                if !m.is_valid_for(text) {
                    log::warn!(
                        "{}: dropping match with invalid span {}..{}",
                        extractor.name(),
                        m.start,
                        m.end
                    );
                    continue;
                }
                candidates.push((rank, m));
            }
        }
        candidates.sort_by_key(|(_, m)| m.start);
        resolve_overlaps(candidates)
    }
}

/// Keeps a non-overlapping subset of `candidates`, returned in text order.
///
/// Candidates are considered by pipeline rank, then leftmost start, then
/// longest span; each is kept if it does not intersect one already kept.
pub fn resolve_overlaps(mut candidates: Vec<(usize, ExtractedMatch)>) -> Vec<ExtractedMatch> {
    candidates.sort_by(|(rank_a, a), (rank_b, b)| {
        rank_a
            .cmp(rank_b)
            .then(a.start.cmp(&b.start))
            .then(b.len().cmp(&a.len()))
    });

    let mut kept: Vec<ExtractedMatch> = Vec::with_capacity(candidates.len());
    for (_, candidate) in candidates {
        if let Some(winner) = kept.iter().find(|k| k.overlaps(&candidate)) {
            log::debug!(
                "Overlap: '{}' ({}) beats '{}' ({})",
                winner.raw_text,
                winner.extractor,
                candidate.raw_text,
                candidate.extractor
            );
            continue;
        }
        kept.push(candidate);
    }
    kept.sort_by_key(|m| m.start);
    kept
}

/// Removes the given non-overlapping spans, then collapses whitespace.
///
/// The title never contains the raw text of a removed match: a removal that
/// would rejoin its neighbours into one ("今今天天" without "今天") leaves a
/// space instead, and lookalikes that did not match in place ("x#a" next to
/// a real "#a") are removed as well.
fn strip_spans(text: &str, matches: &[ExtractedMatch]) -> String {
    let raws: Vec<&str> = matches
        .iter()
        .map(|m| m.raw_text.as_str())
        .filter(|raw| !raw.is_empty())
        .collect();

    let mut out = text.to_string();
    // Right to left so earlier offsets stay valid.
    for m in matches.iter().rev() {
        out.replace_range(m.start..m.end, "");
        if reforms_any(&out, m.start, &raws) {
            out.insert(m.start, ' ');
        }
    }

    let mut title = collapse_whitespace(&out);
    // Each pass shortens the title, so this terminates.
    while let Some(raw) = raws.iter().find(|raw| title.contains(**raw)) {
        log::debug!("Removing leftover '{}' from title", raw);
        title = collapse_whitespace(&title.replace(*raw, ""));
    }
    title
}

/// Whether some raw text occurs in `s` across byte offset `join`.
fn reforms_any(s: &str, join: usize, raws: &[&str]) -> bool {
    raws.iter().any(|raw| {
        (join.saturating_sub(raw.len())..join)
            .filter(|&i| s.is_char_boundary(i))
            .any(|i| i + raw.len() > join && s[i..].starts_with(raw))
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn syntax_type(kind: MatchKind) -> SyntaxType {
    match kind {
        MatchKind::Date => SyntaxType::DueDate,
        MatchKind::Priority => SyntaxType::Priority,
        MatchKind::Project => SyntaxType::Project,
        MatchKind::Label => SyntaxType::Label,
    }
}
