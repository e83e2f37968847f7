// File: ./src/parser/extractors/tags.rs
// Label (#) and project (@) extractors built on tag patterns.
use super::{Extractor, LABEL_EXTRACTOR, PROJECT_EXTRACTOR};
use crate::error::ConfigError;
use crate::model::{ExtractedMatch, ExtractionContext, MatchKind, MatchValue};
use crate::parser::tag::{TagPattern, TagPatternOptions, build_tag_pattern};

/// Finds `#label` or `@project` tags.
///
/// With a candidate list in the context only known names match, so a stray
/// `#` cannot create a new label by accident. Without one, any tag body is
/// accepted. A locale may accept several prefix characters (e.g. `#` and the
/// full-width `＃`).
#[derive(Debug)]
pub struct TagExtractor {
    name: &'static str,
    kind: MatchKind,
    prefixes: Vec<char>,
    open_patterns: Vec<TagPattern>,
}

impl TagExtractor {
    pub fn labels(prefixes: &[char]) -> Result<Self, ConfigError> {
        Self::new(LABEL_EXTRACTOR, MatchKind::Label, prefixes)
    }

    pub fn projects(prefixes: &[char]) -> Result<Self, ConfigError> {
        Self::new(PROJECT_EXTRACTOR, MatchKind::Project, prefixes)
    }

    fn new(name: &'static str, kind: MatchKind, prefixes: &[char]) -> Result<Self, ConfigError> {
        let open_patterns = prefixes
            .iter()
            .map(|&p| build_tag_pattern(TagPatternOptions::new(p)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name,
            kind,
            prefixes: prefixes.to_vec(),
            open_patterns,
        })
    }

    fn candidates<'a>(&self, ctx: &'a ExtractionContext) -> Option<&'a Vec<String>> {
        match self.kind {
            MatchKind::Label => ctx.labels.as_ref(),
            MatchKind::Project => ctx.projects.as_ref(),
            _ => None,
        }
    }

    fn value(&self, name: String) -> MatchValue {
        match self.kind {
            MatchKind::Project => MatchValue::Project(name),
            _ => MatchValue::Label(name),
        }
    }
}

impl Extractor for TagExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> MatchKind {
        self.kind
    }

    fn extract(&self, text: &str, ctx: &ExtractionContext) -> Vec<ExtractedMatch> {
        // Candidate lists change on every call, so restricted patterns are
        // compiled per call; the open patterns are reused.
        let restricted: Vec<TagPattern>;
        let patterns = match self.candidates(ctx) {
            None => &self.open_patterns,
            Some(list) => {
                restricted = self
                    .prefixes
                    .iter()
                    .filter_map(|&p| {
                        let options = TagPatternOptions::new(p).with_candidates(list.iter().cloned());
                        build_tag_pattern(options)
                            .map_err(|e| log::warn!("{}: skipping candidate pattern: {}", self.name, e))
                            .ok()
                    })
                    .collect();
                &restricted
            }
        };

        let mut matches: Vec<ExtractedMatch> = patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text))
            .map(|tag| ExtractedMatch::new(self.name, text, tag.start, tag.end, self.value(tag.canonical)))
            .collect();
        matches.sort_by_key(|m| m.start);
        matches
    }
}
