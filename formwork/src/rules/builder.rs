//! Fluent construction of [`RuleSet`]s.

use std::sync::Arc;

use regex::Regex;

use super::messages::{Bounds, MessageCatalog};
use super::patterns::{self, Matcher};
use super::{
    CompareForRule, CompareWithRule, CustomRule, LengthRule, PatternRule, RangeRule,
    RequiredRule, RuleSet,
};

/// Builder for a field's [`RuleSet`].
///
/// The label is the human-readable field name interpolated into messages.
/// A trailing `" *"` (a visual "required" marker) is stripped first.
///
/// # Example
///
/// ```
/// use formwork::rules::RuleBuilder;
///
/// let rules = RuleBuilder::new("Password *")
///     .required(true)
///     .min_length(4)
///     .max_length(8)
///     .build();
///
/// assert_eq!(rules.required.unwrap().message, "Password is required");
/// ```
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    label: String,
    catalog: Arc<MessageCatalog>,
    required: bool,
    required_if_not_empty: Vec<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min_range: Option<f64>,
    max_range: Option<f64>,
    patterns: Vec<Matcher>,
    compare_with: Option<String>,
    compare_for: Option<String>,
    custom: Option<CustomRule>,
}

impl RuleBuilder {
    /// Create a builder using the default English catalog.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_catalog(label, Arc::new(MessageCatalog::default()))
    }

    /// Create a builder resolving messages from `catalog`.
    pub fn with_catalog(label: impl Into<String>, catalog: Arc<MessageCatalog>) -> Self {
        Self {
            label: label.into(),
            catalog,
            required: false,
            required_if_not_empty: Vec::new(),
            min_length: None,
            max_length: None,
            min_range: None,
            max_range: None,
            patterns: Vec::new(),
            compare_with: None,
            compare_for: None,
            custom: None,
        }
    }

    /// Require a value.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Require a value only while one of `siblings` is non-empty.
    pub fn required_if_not_empty<I, S>(mut self, siblings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_if_not_empty = siblings.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn min_range(mut self, min: f64) -> Self {
        self.min_range = Some(min);
        self
    }

    pub fn max_range(mut self, max: f64) -> Self {
        self.max_range = Some(max);
        self
    }

    /// Append a pattern. All appended patterns must match the whole value.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.patterns.push(Matcher::whole(&pattern));
        self
    }

    pub fn email(mut self) -> Self {
        self.patterns.push(Matcher::Email);
        self
    }

    /// At least one digit.
    pub fn digit(self) -> Self {
        self.pattern(patterns::DIGIT.clone())
    }

    /// At least one uppercase ASCII letter.
    pub fn uppercase(self) -> Self {
        self.pattern(patterns::UPPERCASE.clone())
    }

    /// At least one lowercase ASCII letter.
    pub fn lowercase(self) -> Self {
        self.pattern(patterns::LOWERCASE.clone())
    }

    /// Value must equal the field named `target`.
    pub fn compare_with(mut self, target: impl Into<String>) -> Self {
        self.compare_with = Some(target.into());
        self
    }

    /// Re-validate the field named `target` whenever this one is validated.
    pub fn compare_for(mut self, target: impl Into<String>) -> Self {
        self.compare_for = Some(target.into());
        self
    }

    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(CustomRule::new(f));
        self
    }

    /// Produce the rule set. Calling this repeatedly yields equivalent sets.
    pub fn build(&self) -> RuleSet {
        let label = self.label.replace(" *", "");

        RuleSet {
            required: self.build_required(&label),
            length: self.build_length(&label),
            range: self.build_range(&label),
            pattern: self.build_pattern(&label),
            compare_with: self.compare_with.as_ref().map(|target| CompareWithRule {
                target: target.clone(),
                message: self
                    .catalog
                    .compare_with_message(&label, &capitalize(target)),
            }),
            compare_for: self
                .compare_for
                .as_ref()
                .map(|target| CompareForRule {
                    target: target.clone(),
                }),
            custom: self.custom.clone(),
        }
    }

    fn build_required(&self, label: &str) -> Option<RequiredRule> {
        if !self.required && self.required_if_not_empty.is_empty() {
            return None;
        }
        Some(RequiredRule {
            message: self.catalog.required_message(label),
            required_if_not_empty: self.required_if_not_empty.clone(),
        })
    }

    fn build_length(&self, label: &str) -> Option<LengthRule> {
        let bounds = Bounds::of(self.min_length, self.max_length)?;
        Some(LengthRule {
            min: self.min_length,
            max: self.max_length,
            message: self
                .catalog
                .length_message(label, bounds, self.min_length, self.max_length),
        })
    }

    fn build_range(&self, label: &str) -> Option<RangeRule> {
        let bounds = Bounds::of(self.min_range, self.max_range)?;
        Some(RangeRule {
            min: self.min_range,
            max: self.max_range,
            message: self
                .catalog
                .range_message(label, bounds, self.min_range, self.max_range),
        })
    }

    fn build_pattern(&self, label: &str) -> Option<PatternRule> {
        if self.patterns.is_empty() {
            return None;
        }
        Some(PatternRule {
            patterns: self.patterns.clone(),
            message: self.catalog.invalid_message(label),
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("password"), "Password");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_label_marker_is_stripped() {
        let rules = RuleBuilder::new("Email *").required(true).email().build();
        assert_eq!(rules.required.unwrap().message, "Email is required");
        assert_eq!(rules.pattern.unwrap().message, "Email is invalid");
    }

    #[test]
    fn test_build_is_idempotent() {
        let builder = RuleBuilder::new("Age").min_range(18.0).max_range(120.0);
        let a = builder.build().range.unwrap();
        let b = builder.build().range.unwrap();
        assert_eq!(a, b);
    }
}
