use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rule scoped to one exact ingredient name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextConversion {
    pub ingredient: String,
    pub source_unit: String,
    pub destination_unit: String,
    pub factor: Decimal,
}

/// A rule scoped to every ingredient whose name matches `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegexConversion {
    pub pattern: String,
    pub source_unit: String,
    pub destination_unit: String,
    pub factor: Decimal,
}

/// "1 `source_unit` = `factor` `destination_unit`", scoped to an ingredient or a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitConversion {
    Text(TextConversion),
    Regex(RegexConversion),
}

impl UnitConversion {
    pub fn text(
        ingredient: impl Into<String>,
        source_unit: impl Into<String>,
        destination_unit: impl Into<String>,
        factor: impl Into<Decimal>,
    ) -> Self {
        Self::Text(TextConversion {
            ingredient: ingredient.into(),
            source_unit: source_unit.into(),
            destination_unit: destination_unit.into(),
            factor: factor.into(),
        })
    }

    pub fn regex(
        pattern: impl Into<String>,
        source_unit: impl Into<String>,
        destination_unit: impl Into<String>,
        factor: impl Into<Decimal>,
    ) -> Self {
        Self::Regex(RegexConversion {
            pattern: pattern.into(),
            source_unit: source_unit.into(),
            destination_unit: destination_unit.into(),
            factor: factor.into(),
        })
    }

    pub fn source_unit(&self) -> &str {
        match self {
            Self::Text(c) => &c.source_unit,
            Self::Regex(c) => &c.source_unit,
        }
    }

    pub fn destination_unit(&self) -> &str {
        match self {
            Self::Text(c) => &c.destination_unit,
            Self::Regex(c) => &c.destination_unit,
        }
    }

    pub fn factor(&self) -> Decimal {
        match self {
            Self::Text(c) => c.factor,
            Self::Regex(c) => c.factor,
        }
    }

    /// Ingredient name for a text rule, pattern text for a regex rule. Grouping only.
    pub fn representation(&self) -> &str {
        match self {
            Self::Text(c) => &c.ingredient,
            Self::Regex(c) => &c.pattern,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Self::Regex(_))
    }

    /// Whether applying `self` can be followed by applying `next`.
    pub fn chains_into(&self, next: &UnitConversion) -> bool {
        self.destination_unit() == next.source_unit()
    }
}

impl std::fmt::Display for UnitConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(c) => write!(f, "{}: ", c.ingredient)?,
            Self::Regex(c) => write!(f, "/{}/: ", c.pattern)?,
        }
        write!(
            f,
            "1 {} = {} {}",
            self.source_unit(),
            self.factor().normalize(),
            self.destination_unit()
        )
    }
}

/// An elementary circuit of chainable conversions.
///
/// Equality is rotation-invariant: `[a, b, c]`, `[b, c, a]` and `[c, a, b]` are the same
/// circle, `[a, c, b]` is not.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Circle {
    conversions: Vec<UnitConversion>,
}

impl Circle {
    /// Panics if `conversions` is empty.
    pub fn new(conversions: Vec<UnitConversion>) -> Self {
        assert!(!conversions.is_empty(), "a circle needs at least one conversion");
        Self { conversions }
    }

    pub fn conversions(&self) -> &[UnitConversion] {
        &self.conversions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnitConversion> {
        self.conversions.iter()
    }

    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }

    pub fn contains(&self, conversion: &UnitConversion) -> bool {
        self.conversions.contains(conversion)
    }

    /// Conversions in cyclic order starting `offset` places in.
    fn rotated(&self, offset: usize) -> impl Iterator<Item = &UnitConversion> + '_ {
        self.conversions
            .iter()
            .cycle()
            .skip(offset)
            .take(self.conversions.len())
    }
}

impl PartialEq for Circle {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && (0..self.len()).any(|offset| self.rotated(offset).eq(other.conversions.iter()))
    }
}

impl Eq for Circle {}

impl Hash for Circle {
    // Order-insensitive, so rotations hash alike.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined: u64 = 0;
        for conversion in &self.conversions {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            conversion.hash(&mut hasher);
            combined = combined.wrapping_add(hasher.finish());
        }
        self.len().hash(state);
        combined.hash(state);
    }
}

impl<'a> IntoIterator for &'a Circle {
    type Item = &'a UnitConversion;
    type IntoIter = std::slice::Iter<'a, UnitConversion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for Circle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for conversion in self {
            write!(f, "({conversion}) -> ")?;
        }
        write!(f, "({})", self.conversions[0])
    }
}
