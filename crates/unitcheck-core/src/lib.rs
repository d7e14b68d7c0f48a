//! Validation of ingredient unit conversion rules.
//!
//! A rule set is usable when no two rules claim the same unit for the same ingredient
//! (or, for pattern rules, the same source unit) and no chain of rules leads back to
//! where it started. [`Validator`] checks both and reports every offending rule group
//! and every elementary circle.

pub mod ambiguity;
pub mod conversion;
pub mod graph;
pub mod partition;
pub mod validator;

pub use ambiguity::{Ambiguities, AmbiguityChecker, TextKey};
pub use conversion::{Circle, RegexConversion, TextConversion, UnitConversion};
pub use graph::{Graph, GraphError, VertexId};
pub use partition::{ConversionPartitioner, Partition, PartitionLabel};
pub use validator::{CheckResult, FailureCause, Validator};

// Re-exported so callers can build factors without a direct dependency.
pub use rust_decimal::Decimal;
