//! Rule model.
//!
//! A [`RuleSet`] bundles every constraint that applies to one field. Rule
//! sets are usually produced by [`RuleBuilder`], which resolves their
//! messages from a [`MessageCatalog`] at construction time.

mod builder;
mod messages;
pub mod patterns;

pub use builder::RuleBuilder;
pub use messages::{MessageCatalog, NumberFormat};
pub use patterns::Matcher;

use std::fmt;
use std::sync::Arc;

/// Value must be present, or present whenever a listed sibling is filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredRule {
    pub message: String,
    /// Sibling field names. Empty means unconditionally required.
    pub required_if_not_empty: Vec<String>,
}

impl RequiredRule {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            required_if_not_empty: Vec::new(),
        }
    }

    pub fn is_conditional(&self) -> bool {
        !self.required_if_not_empty.is_empty()
    }
}

/// Inclusive character-count bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthRule {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub message: String,
}

impl LengthRule {
    pub fn contains(&self, len: usize) -> bool {
        self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRule {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub message: String,
}

impl RangeRule {
    pub fn contains(&self, value: f64) -> bool {
        !(self.min.is_some_and(|min| value < min) || self.max.is_some_and(|max| value > max))
    }
}

/// Every matcher must accept the value.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub patterns: Vec<Matcher>,
    pub message: String,
}

impl PatternRule {
    pub fn matches(&self, value: &str) -> bool {
        self.patterns.iter().all(|p| p.matches(value))
    }
}

/// Value must equal the named sibling's current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareWithRule {
    pub target: String,
    pub message: String,
}

/// Marks this field as the source of a comparison owned by `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareForRule {
    pub target: String,
}

type CustomFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Arbitrary check on a text value, returning an error message on failure.
#[derive(Clone)]
pub struct CustomRule(Arc<CustomFn>);

impl CustomRule {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn check(&self, value: &str) -> Option<String> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRule(..)")
    }
}

/// Constraints for a single field.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub required: Option<RequiredRule>,
    pub length: Option<LengthRule>,
    pub range: Option<RangeRule>,
    pub pattern: Option<PatternRule>,
    pub compare_with: Option<CompareWithRule>,
    pub compare_for: Option<CompareForRule>,
    pub custom: Option<CustomRule>,
}

impl RuleSet {
    /// A rule set with no constraints; every value passes.
    pub fn none() -> Self {
        Self::default()
    }

    /// Copy of this rule set with the required rule replaced.
    pub fn with_required(&self, required: Option<RequiredRule>) -> Self {
        Self {
            required,
            ..self.clone()
        }
    }

    pub fn compare_for_target(&self) -> Option<&str> {
        self.compare_for.as_ref().map(|rule| rule.target.as_str())
    }
}
