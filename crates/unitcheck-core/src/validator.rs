use std::collections::BTreeMap;

use serde::Serialize;

use crate::ambiguity::{AmbiguityChecker, TextKey};
use crate::conversion::{Circle, UnitConversion};
use crate::partition::ConversionPartitioner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCause {
    None,
    /// Some unit is claimed by more than one rule. Circularity is not evaluated.
    Ambiguous,
    /// Some chain of rules leads back to where it started.
    Circle,
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Ambiguous => "ambiguous",
            Self::Circle => "circle",
        };
        write!(f, "{s}")
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    failure_cause: FailureCause,
    problem_text_conversions: BTreeMap<TextKey, Vec<UnitConversion>>,
    problem_regex_conversions: BTreeMap<String, Vec<UnitConversion>>,
    circles: Vec<Circle>,
}

impl CheckResult {
    pub fn is_successful(&self) -> bool {
        self.failure_cause == FailureCause::None
    }

    pub fn failure_cause(&self) -> FailureCause {
        self.failure_cause
    }

    /// Colliding text rules for `(ingredient, source_unit)`, if that key is ambiguous.
    pub fn problem_text_conversions(
        &self,
        ingredient: &str,
        source_unit: &str,
    ) -> Option<&[UnitConversion]> {
        self.problem_text_conversions
            .get(&TextKey::new(ingredient, source_unit))
            .map(Vec::as_slice)
    }

    /// Colliding regex rules for `source_unit`, if that unit is ambiguous.
    pub fn problem_regex_conversions(&self, source_unit: &str) -> Option<&[UnitConversion]> {
        self.problem_regex_conversions
            .get(source_unit)
            .map(Vec::as_slice)
    }

    pub fn ambiguous_text_groups(&self) -> impl Iterator<Item = (&TextKey, &[UnitConversion])> {
        self.problem_text_conversions
            .iter()
            .map(|(key, group)| (key, group.as_slice()))
    }

    pub fn ambiguous_regex_groups(&self) -> impl Iterator<Item = (&str, &[UnitConversion])> {
        self.problem_regex_conversions
            .iter()
            .map(|(unit, group)| (unit.as_str(), group.as_slice()))
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }
}

/// Checks one rule set for ambiguity, then (only if unambiguous) for circularity.
///
/// The first [`Validator::run`] computes the result; later calls return it unchanged.
/// Validate a different rule set with a new `Validator`.
#[derive(Debug, Clone)]
pub struct Validator {
    conversions: Vec<UnitConversion>,
    result: Option<CheckResult>,
}

impl Validator {
    pub fn new(conversions: impl IntoIterator<Item = UnitConversion>) -> Self {
        Self {
            conversions: conversions.into_iter().collect(),
            result: None,
        }
    }

    pub fn conversions(&self) -> &[UnitConversion] {
        &self.conversions
    }

    pub fn has_run(&self) -> bool {
        self.result.is_some()
    }

    pub fn run(&mut self) -> &CheckResult {
        let conversions = &self.conversions;
        self.result.get_or_insert_with(|| validate(conversions))
    }

    pub fn into_result(self) -> CheckResult {
        match self.result {
            Some(result) => result,
            None => validate(&self.conversions),
        }
    }
}

fn validate(conversions: &[UnitConversion]) -> CheckResult {
    log::debug!("validating {} conversions", conversions.len());

    let ambiguities = AmbiguityChecker::check(conversions);
    if !ambiguities.is_empty() {
        return CheckResult {
            failure_cause: FailureCause::Ambiguous,
            problem_text_conversions: ambiguities.text,
            problem_regex_conversions: ambiguities.regex,
            circles: Vec::new(),
        };
    }

    let partitioner = ConversionPartitioner::new(conversions);
    let circles = partitioner.find_circles();
    log::debug!(
        "{} partitions, {} circles",
        partitioner.partitions().len(),
        circles.len()
    );

    let failure_cause = if circles.is_empty() {
        FailureCause::None
    } else {
        FailureCause::Circle
    };
    CheckResult {
        failure_cause,
        problem_text_conversions: BTreeMap::new(),
        problem_regex_conversions: BTreeMap::new(),
        circles,
    }
}
