// File: ./src/error.rs
//! Configuration errors raised while building capture pipelines.
//!
//! Nothing in this module is produced while parsing text: a parse call always
//! returns a best-effort result. These errors surface only when a tag pattern
//! or a locale pipeline is constructed with bad input from the caller.

use thiserror::Error;

/// Errors raised when building a tag pattern or a locale pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The tag prefix is a word character, whitespace or a control character.
    #[error("Invalid tag prefix {0:?}: the prefix must be a punctuation or symbol character")]
    InvalidPrefix(char),

    /// A disable or reorder list names an extractor the locale does not have.
    #[error("Unknown extractor '{name}' for locale '{locale}'")]
    UnknownExtractor { locale: String, name: String },

    /// A disable or reorder list names a processor the locale does not have.
    #[error("Unknown processor '{name}' for locale '{locale}'")]
    UnknownProcessor { locale: String, name: String },

    /// The same name appears twice in an order override.
    #[error("'{0}' appears more than once in the order override")]
    DuplicateOrderEntry(String),

    /// A name is both disabled and listed in the order override.
    #[error("'{0}' is disabled but also listed in the order override")]
    DisabledAndOrdered(String),

    /// A configuration file names a locale without a capture vocabulary.
    #[error("Unsupported locale '{0}'")]
    UnknownLocale(String),

    /// The generated regular expression was rejected by the regex engine.
    #[error("Failed to compile pattern: {0}")]
    InvalidPattern(String),
}

impl From<regex::Error> for ConfigError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern(err.to_string())
    }
}
