use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::conversion::UnitConversion;

/// (ingredient, source unit): at most one text rule may claim it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TextKey {
    pub ingredient: String,
    pub source_unit: String,
}

impl TextKey {
    pub fn new(ingredient: impl Into<String>, source_unit: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            source_unit: source_unit.into(),
        }
    }
}

impl std::fmt::Display for TextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.ingredient, self.source_unit)
    }
}

/// Rule groups whose keys collide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ambiguities {
    pub text: BTreeMap<TextKey, Vec<UnitConversion>>,
    /// keyed by source unit
    pub regex: BTreeMap<String, Vec<UnitConversion>>,
}

impl Ambiguities {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.regex.is_empty()
    }
}

/// Collects rules by the question they answer ("how do I convert unit X of ingredient Y")
/// and reports every question answered more than once. Works on the whole rule set,
/// not per partition.
#[derive(Debug, Default)]
pub struct AmbiguityChecker {
    handled_text: HashMap<TextKey, Vec<UnitConversion>>,
    handled_regex: HashMap<String, Vec<UnitConversion>>,
}

impl AmbiguityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(conversions: &[UnitConversion]) -> Ambiguities {
        let mut checker = Self::new();
        for conversion in conversions {
            checker.add(conversion);
        }
        checker.finish()
    }

    pub fn add(&mut self, conversion: &UnitConversion) {
        match conversion {
            UnitConversion::Text(text) => self
                .handled_text
                .entry(TextKey::new(&text.ingredient, &text.source_unit))
                .or_default()
                .push(conversion.clone()),
            UnitConversion::Regex(regex) => self
                .handled_regex
                .entry(regex.source_unit.clone())
                .or_default()
                .push(conversion.clone()),
        }
    }

    pub fn finish(self) -> Ambiguities {
        let ambiguities = Ambiguities {
            text: self
                .handled_text
                .into_iter()
                .filter(|(_, group)| group.len() > 1)
                .collect(),
            regex: self
                .handled_regex
                .into_iter()
                .filter(|(_, group)| group.len() > 1)
                .collect(),
        };
        log::debug!(
            "{} ambiguous text keys, {} ambiguous regex source units",
            ambiguities.text.len(),
            ambiguities.regex.len()
        );
        ambiguities
    }
}
