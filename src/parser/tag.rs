// File: ./src/parser/tag.rs
//! Patterns for prefix-marked tokens such as `#label`, `@project` or `!1`.
//!
//! A tag is a prefix character followed by a body. The prefix only counts
//! when it is not glued to a preceding letter, digit or underscore, so the
//! `@` of `mail@example.com` is never a project marker. Bodies are either a
//! generic run of word characters and hyphens, or one of a caller-supplied
//! list of candidate names (matched case-insensitively, longest first, so
//! `#Work Tasks` beats `#Work`).

use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};

/// Characters allowed inside a generic tag body.
const BODY_CLASS: &str = r"\p{L}\p{M}\p{N}_\-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternFlags {
    pub case_insensitive: bool,
    /// Requested Unicode support. Tag patterns always enable it.
    pub unicode: bool,
}

impl Default for PatternFlags {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            unicode: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPatternOptions {
    pub prefix: char,
    pub candidates: Option<Vec<String>>,
    pub flags: PatternFlags,
}

impl TagPatternOptions {
    pub fn new(prefix: char) -> Self {
        Self {
            prefix,
            candidates: None,
            flags: PatternFlags::default(),
        }
    }

    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = Some(candidates.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_flags(mut self, flags: PatternFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// One tag occurrence. `start` points at the prefix, `end` just past the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    pub start: usize,
    pub end: usize,
    /// The body exactly as typed.
    pub body: String,
    /// The candidate spelling when matched against a candidate list, else the body.
    pub canonical: String,
}

#[derive(Debug, Clone)]
pub struct TagPattern {
    prefix: char,
    // None when built from an empty candidate list: such a pattern never matches.
    regex: Option<Regex>,
    candidates: Vec<String>,
}

pub fn is_valid_prefix(prefix: char) -> bool {
    !(prefix.is_alphanumeric() || prefix == '_' || prefix.is_whitespace() || prefix.is_control())
}

/// Builds the pattern described by `options`.
///
/// Fails only when the prefix itself could be part of a word.
pub fn build_tag_pattern(options: TagPatternOptions) -> Result<TagPattern, ConfigError> {
    let TagPatternOptions {
        prefix,
        candidates,
        flags,
    } = options;

    if !is_valid_prefix(prefix) {
        return Err(ConfigError::InvalidPrefix(prefix));
    }
    if !flags.unicode {
        log::debug!("Tag pattern '{}': ignoring request to disable Unicode", prefix);
    }

    let candidates = candidates.map(normalize_candidates);
    let body = match &candidates {
        None => format!("[{BODY_CLASS}]+"),
        Some(list) if list.is_empty() => {
            return Ok(TagPattern {
                prefix,
                regex: None,
                candidates: Vec::new(),
            });
        }
        Some(list) => {
            let alternatives: Vec<String> = list.iter().map(|c| regex::escape(c)).collect();
            format!("(?i:{})", alternatives.join("|"))
        }
    };

    let prefix_str = regex::escape(&prefix.to_string());
    let pattern = format!(r"\B{prefix_str}({body})(?:[^{BODY_CLASS}]|$)");
    let regex = RegexBuilder::new(&pattern)
        .unicode(true)
        .case_insensitive(flags.case_insensitive)
        .build()?;

    Ok(TagPattern {
        prefix,
        regex: Some(regex),
        candidates: candidates.unwrap_or_default(),
    })
}

// Trimmed, non-empty, deduplicated case-insensitively, longest first.
fn normalize_candidates(candidates: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for c in candidates {
        let c = c.trim();
        if c.is_empty() {
            continue;
        }
        let lower = c.to_lowercase();
        if out.iter().any(|o| o.to_lowercase() == lower) {
            continue;
        }
        out.push(c.to_string());
    }
    out.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    out
}

impl TagPattern {
    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// The compiled regex; the tag body is capture group 1.
    pub fn as_regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    pub fn is_match(&self, text: &str) -> bool {
        !self.find_iter(text).is_empty()
    }

    /// All non-overlapping tags in `text`, left to right.
    pub fn find_iter(&self, text: &str) -> Vec<TagMatch> {
        let mut out = Vec::new();
        let Some(regex) = &self.regex else {
            return out;
        };

        // The trailing boundary char is consumed by the regex, so resume at
        // the body end: that char may be the start of the next tag's context.
        let mut pos = 0;
        while pos <= text.len() {
            let Some(body) = regex.captures_at(text, pos).and_then(|caps| caps.get(1)) else {
                break;
            };
            let start = body.start() - self.prefix.len_utf8();
            out.push(TagMatch {
                start,
                end: body.end(),
                body: body.as_str().to_string(),
                canonical: self.canonical(body.as_str()),
            });
            pos = body.end();
        }
        out
    }

    fn canonical(&self, body: &str) -> String {
        let lower = body.to_lowercase();
        self.candidates
            .iter()
            .find(|c| c.to_lowercase() == lower)
            .cloned()
            .unwrap_or_else(|| body.to_string())
    }
}
