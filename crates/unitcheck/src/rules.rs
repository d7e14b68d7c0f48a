use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use unitcheck_core::UnitConversion;

/// A rule file: `[[text]]` rules scoped to one ingredient, `[[regex]]` rules scoped to a
/// name pattern.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    #[serde(default)]
    pub text: Vec<TextRule>,

    #[serde(default)]
    pub regex: Vec<RegexRule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextRule {
    pub ingredient: String,
    pub from: String,
    pub to: String,
    pub factor: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexRule {
    pub pattern: String,
    pub from: String,
    pub to: String,
    pub factor: Decimal,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("{kind} rule #{index}: `{field}` must not be empty")]
    EmptyField {
        kind: &'static str,
        index: usize,
        field: &'static str,
    },
    #[error("regex rule #{index}: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        source: Box<regex::Error>,
    },
}

impl RuleFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse rule file: {e}"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.text.len() + self.regex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text rules in file order, then regex rules in file order. Malformed rules are
    /// rejected here; the validator assumes it only ever sees well-formed ones.
    pub fn into_conversions(self) -> Result<Vec<UnitConversion>, RuleError> {
        let mut conversions = Vec::with_capacity(self.len());

        for (index, rule) in self.text.into_iter().enumerate() {
            let index = index + 1;
            require("text", index, "ingredient", &rule.ingredient)?;
            require("text", index, "from", &rule.from)?;
            require("text", index, "to", &rule.to)?;
            conversions.push(UnitConversion::text(
                rule.ingredient,
                rule.from,
                rule.to,
                rule.factor,
            ));
        }

        for (index, rule) in self.regex.into_iter().enumerate() {
            let index = index + 1;
            require("regex", index, "pattern", &rule.pattern)?;
            require("regex", index, "from", &rule.from)?;
            require("regex", index, "to", &rule.to)?;
            if let Err(e) = Regex::new(&rule.pattern) {
                return Err(RuleError::InvalidPattern {
                    index,
                    pattern: rule.pattern,
                    source: Box::new(e),
                });
            }
            conversions.push(UnitConversion::regex(
                rule.pattern,
                rule.from,
                rule.to,
                rule.factor,
            ));
        }

        log::debug!("loaded {} conversions", conversions.len());
        Ok(conversions)
    }
}

fn require(
    kind: &'static str,
    index: usize,
    field: &'static str,
    value: &str,
) -> Result<(), RuleError> {
    if value.trim().is_empty() {
        return Err(RuleError::EmptyField { kind, index, field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"
[[text]]
ingredient = "Mehl"
from = "kg"
to = "g"
factor = 1000

[[regex]]
pattern = ".*"
from = "EL"
to = "g"
factor = "12.5"

[[text]]
ingredient = "Mehl"
from = "g"
to = "Pck"
factor = 0.001
"#;

    #[test]
    fn test_parse_keeps_order_text_first() {
        let file = RuleFile::parse(RULES).unwrap();
        assert_eq!(file.len(), 3);

        let conversions = file.into_conversions().unwrap();
        assert_eq!(
            conversions,
            vec![
                UnitConversion::text("Mehl", "kg", "g", 1000),
                UnitConversion::text("Mehl", "g", "Pck", Decimal::new(1, 3)),
                UnitConversion::regex(".*", "EL", "g", Decimal::new(125, 1)),
            ]
        );
    }

    #[test]
    fn test_empty_file() {
        let file = RuleFile::parse("").unwrap();
        assert!(file.is_empty());
        assert!(file.into_conversions().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RuleFile::parse("[[text]]\ningredient = \"Mehl\"\nsource = \"kg\"\n").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse rule file"));
    }

    #[test]
    fn test_empty_unit_rejected() {
        let file = RuleFile::parse(
            "[[text]]\ningredient = \"Mehl\"\nfrom = \" \"\nto = \"g\"\nfactor = 1\n",
        )
        .unwrap();
        let err = file.into_conversions().unwrap_err();
        assert!(matches!(
            err,
            RuleError::EmptyField {
                kind: "text",
                index: 1,
                field: "from"
            }
        ));
        assert_eq!(err.to_string(), "text rule #1: `from` must not be empty");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let file = RuleFile::parse(
            "[[regex]]\npattern = \"(Mehl\"\nfrom = \"kg\"\nto = \"g\"\nfactor = 1000\n",
        )
        .unwrap();
        let err = file.into_conversions().unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { index: 1, .. }));
        assert!(err
            .to_string()
            .starts_with("regex rule #1: invalid pattern `(Mehl`"));
    }
}
