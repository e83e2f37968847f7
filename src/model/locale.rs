// File: ./src/model/locale.rs
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Languages the capture parser has vocabularies for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    #[strum(serialize = "en")]
    English,
    #[serde(rename = "zh")]
    #[strum(serialize = "zh")]
    Chinese,
}

impl Locale {
    /// Maps a language tag such as `zh-CN`, `zh_Hans` or `en-US` to a supported locale.
    ///
    /// Only the primary language subtag is considered. Returns `None` for
    /// languages without a capture vocabulary.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Locale::from_str(&primary).ok()
    }

    /// The OS locale if it is supported, English otherwise.
    pub fn system() -> Self {
        sys_locale::get_locale()
            .and_then(|tag| Self::from_tag(&tag))
            .unwrap_or_default()
    }
}
