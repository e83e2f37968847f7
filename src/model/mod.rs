// File: ./src/model/mod.rs
pub mod extraction;
pub mod locale;
pub mod result;

pub use extraction::{ExtractedMatch, ExtractionContext, MatchKind, MatchValue};
pub use locale::Locale;
pub use result::{ParseResult, SyntaxToken, SyntaxType};
