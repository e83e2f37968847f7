// File: ./src/parser/locale.rs
//! Per-locale pipelines.
//!
//! Each supported locale is a concrete [`LocaleConfig`] that owns its
//! extractor and processor lists. Callers can disable stages by name or move
//! some of them to the front; everything is resolved and validated once, at
//! construction, so a parse never meets a configuration error.

use crate::error::ConfigError;
use crate::model::Locale;
use crate::parser::extractors::{
    ChineseDateExtractor, ChinesePriorityExtractor, EnglishDateExtractor, EnglishPriorityExtractor,
    Extractor, TagExtractor,
};
use crate::parser::processors::{
    DateProcessor, LabelProcessor, PriorityProcessor, Processor, ProjectProcessor,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum::IntoEnumIterator;

/// Caller tuning for one locale's pipeline.
///
/// Stages named in an `*_order` list move to the front in the given order;
/// the rest keep their default relative order. Every name must exist in the
/// locale's default pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOverrides {
    pub disabled_extractors: Vec<String>,
    pub extractor_order: Vec<String>,
    pub disabled_processors: Vec<String>,
    pub processor_order: Vec<String>,
}

impl PipelineOverrides {
    pub fn disable_extractors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_extractors.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn extractor_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extractor_order = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn disable_processors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_processors.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn processor_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processor_order = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub trait LocaleConfig: Send + Sync + std::fmt::Debug {
    fn locale(&self) -> Locale;

    /// Active extractors in pipeline order; earlier entries win overlaps.
    fn get_extractors(&self) -> &[Box<dyn Extractor>];

    /// Active processors in the order they are run.
    fn get_processors(&self) -> &[Box<dyn Processor>];
}

/// Applies disable and reorder lists to a default stage list.
fn resolve_stages<T>(
    defaults: Vec<T>,
    name_of: impl Fn(&T) -> &'static str,
    disabled: &[String],
    order: &[String],
    unknown: impl Fn(&str) -> ConfigError,
) -> Result<Vec<T>, ConfigError> {
    let known: HashSet<&str> = defaults.iter().map(&name_of).collect();
    if let Some(name) = disabled.iter().chain(order).find(|n| !known.contains(n.as_str())) {
        return Err(unknown(name));
    }

    let mut seen = HashSet::new();
    for name in order {
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicateOrderEntry(name.clone()));
        }
        if disabled.contains(name) {
            return Err(ConfigError::DisabledAndOrdered(name.clone()));
        }
    }

    let mut slots: Vec<Option<T>> = defaults
        .into_iter()
        .filter(|stage| !disabled.iter().any(|d| d == name_of(stage)))
        .map(Some)
        .collect();

    let mut resolved = Vec::with_capacity(slots.len());
    for name in order {
        let slot = slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|stage| name_of(stage) == name));
        if let Some(stage) = slot.and_then(Option::take) {
            resolved.push(stage);
        }
    }
    resolved.extend(slots.into_iter().flatten());
    Ok(resolved)
}

#[derive(Debug)]
struct Pipeline {
    extractors: Vec<Box<dyn Extractor>>,
    processors: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    fn resolve(
        locale: Locale,
        extractors: Vec<Box<dyn Extractor>>,
        processors: Vec<Box<dyn Processor>>,
        overrides: &PipelineOverrides,
    ) -> Result<Self, ConfigError> {
        let extractors = resolve_stages(
            extractors,
            |e| e.name(),
            &overrides.disabled_extractors,
            &overrides.extractor_order,
            |name| ConfigError::UnknownExtractor {
                locale: locale.to_string(),
                name: name.to_string(),
            },
        )?;
        let processors = resolve_stages(
            processors,
            |p| p.name(),
            &overrides.disabled_processors,
            &overrides.processor_order,
            |name| ConfigError::UnknownProcessor {
                locale: locale.to_string(),
                name: name.to_string(),
            },
        )?;
        log::debug!(
            "Pipeline for '{}': extractors [{}], processors [{}]",
            locale,
            extractors.iter().map(|e| e.name()).collect::<Vec<_>>().join(", "),
            processors.iter().map(|p| p.name()).collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            extractors,
            processors,
        })
    }
}

fn default_processors() -> Vec<Box<dyn Processor>> {
    vec![
        Box::new(DateProcessor),
        Box::new(PriorityProcessor),
        Box::new(LabelProcessor),
        Box::new(ProjectProcessor),
    ]
}

/// English: `#label`, `@project`, `!1`/`!high`, and English date phrases.
#[derive(Debug)]
pub struct EnglishConfig {
    pipeline: Pipeline,
}

impl EnglishConfig {
    pub fn new(overrides: &PipelineOverrides) -> Result<Self, ConfigError> {
        let extractors: Vec<Box<dyn Extractor>> = vec![
            Box::new(TagExtractor::labels(&['#'])?),
            Box::new(TagExtractor::projects(&['@'])?),
            Box::new(EnglishPriorityExtractor::new()?),
            Box::new(EnglishDateExtractor::new()),
        ];
        let pipeline = Pipeline::resolve(Locale::English, extractors, default_processors(), overrides)?;
        Ok(Self { pipeline })
    }
}

impl LocaleConfig for EnglishConfig {
    fn locale(&self) -> Locale {
        Locale::English
    }

    fn get_extractors(&self) -> &[Box<dyn Extractor>] {
        &self.pipeline.extractors
    }

    fn get_processors(&self) -> &[Box<dyn Processor>] {
        &self.pipeline.processors
    }
}

/// Chinese: ASCII and full-width tag prefixes (`#`/`＃`, `@`/`＠`, `!`/`！`)
/// and Chinese relative dates.
#[derive(Debug)]
pub struct ChineseConfig {
    pipeline: Pipeline,
}

impl ChineseConfig {
    pub fn new(overrides: &PipelineOverrides) -> Result<Self, ConfigError> {
        let extractors: Vec<Box<dyn Extractor>> = vec![
            Box::new(TagExtractor::labels(&['#', '＃'])?),
            Box::new(TagExtractor::projects(&['@', '＠'])?),
            Box::new(ChinesePriorityExtractor::new()),
            Box::new(ChineseDateExtractor::new()),
        ];
        let pipeline = Pipeline::resolve(Locale::Chinese, extractors, default_processors(), overrides)?;
        Ok(Self { pipeline })
    }
}

impl LocaleConfig for ChineseConfig {
    fn locale(&self) -> Locale {
        Locale::Chinese
    }

    fn get_extractors(&self) -> &[Box<dyn Extractor>] {
        &self.pipeline.extractors
    }

    fn get_processors(&self) -> &[Box<dyn Processor>] {
        &self.pipeline.processors
    }
}

/// Builds the concrete configuration for `locale`.
pub fn config_for(
    locale: Locale,
    overrides: &PipelineOverrides,
) -> Result<Box<dyn LocaleConfig>, ConfigError> {
    Ok(match locale {
        Locale::English => Box::new(EnglishConfig::new(overrides)?),
        Locale::Chinese => Box::new(ChineseConfig::new(overrides)?),
    })
}

/// One configuration per supported locale, built once and shared read-only.
#[derive(Debug)]
pub struct LocaleRegistry {
    configs: HashMap<Locale, Box<dyn LocaleConfig>>,
}

impl LocaleRegistry {
    /// Builds every supported locale, applying the overrides given for it.
    pub fn new(overrides: &HashMap<Locale, PipelineOverrides>) -> Result<Self, ConfigError> {
        let none = PipelineOverrides::default();
        let configs = Locale::iter()
            .map(|locale| {
                let o = overrides.get(&locale).unwrap_or(&none);
                if !o.is_empty() {
                    log::debug!("Applying pipeline overrides for '{}': {:?}", locale, o);
                }
                config_for(locale, o).map(|config| (locale, config))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { configs })
    }

    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(&HashMap::new())
    }

    /// Registry from hand-built configurations; a later entry for the same locale replaces an earlier one.
    pub fn from_configs(configs: Vec<Box<dyn LocaleConfig>>) -> Self {
        Self {
            configs: configs.into_iter().map(|c| (c.locale(), c)).collect(),
        }
    }

    pub fn get(&self, locale: Locale) -> Option<&dyn LocaleConfig> {
        self.configs.get(&locale).map(|c| c.as_ref())
    }

    pub fn locales(&self) -> Vec<Locale> {
        Locale::iter().filter(|l| self.configs.contains_key(l)).collect()
    }
}
