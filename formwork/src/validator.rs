//! Pure validation of a single value against a [`RuleSet`].
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. required (absent value, `false`, empty string)
//! 2. by value kind:
//!    - text: length, numeric range when the text parses as a number,
//!      custom, patterns
//!    - number: range
//!    - collection: required-and-empty
//!    - boolean: nothing further
//!
//! Cross-field rules (`compare_with`, `compare_for`, conditional required)
//! need the rest of the form and are resolved by [`Form`](crate::form::Form).

use crate::rules::{LengthRule, PatternRule, RangeRule, RequiredRule, RuleSet};
use crate::value::{FormValue, Value};

/// Validate `value`, returning the message of the first failing rule.
pub fn validate(value: &FormValue, rules: &RuleSet) -> Option<String> {
    if let Some(error) = check_required(value, rules.required.as_ref()) {
        return Some(error);
    }

    match value.as_value()? {
        Value::Text(text) => validate_text(text, rules),
        number @ (Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_)) => number
            .as_number()
            .and_then(|n| check_range(n, rules.range.as_ref())),
        Value::List(items) => match &rules.required {
            Some(required) if items.is_empty() => Some(required.message.clone()),
            _ => None,
        },
        Value::Bool(_) => None,
    }
}

fn check_required(value: &FormValue, rule: Option<&RequiredRule>) -> Option<String> {
    let rule = rule?;
    match value.as_value() {
        None | Some(Value::Bool(false)) => Some(rule.message.clone()),
        Some(Value::Text(text)) if text.is_empty() => Some(rule.message.clone()),
        _ => None,
    }
}

fn validate_text(text: &str, rules: &RuleSet) -> Option<String> {
    if let Some(error) = check_length(text, rules.length.as_ref()) {
        return Some(error);
    }

    if let Ok(number) = text.parse::<f64>()
        && let Some(error) = check_range(number, rules.range.as_ref())
    {
        return Some(error);
    }

    if let Some(error) = rules.custom.as_ref().and_then(|custom| custom.check(text)) {
        return Some(error);
    }

    check_pattern(text, rules.pattern.as_ref())
}

fn check_length(text: &str, rule: Option<&LengthRule>) -> Option<String> {
    let rule = rule?;
    (!rule.contains(text.chars().count())).then(|| rule.message.clone())
}

fn check_range(number: f64, rule: Option<&RangeRule>) -> Option<String> {
    let rule = rule?;
    (!rule.contains(number)).then(|| rule.message.clone())
}

fn check_pattern(text: &str, rule: Option<&PatternRule>) -> Option<String> {
    let rule = rule?;
    (!rule.matches(text)).then(|| rule.message.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleBuilder;

    #[test]
    fn test_no_rules_always_passes() {
        let rules = RuleSet::none();
        assert_eq!(validate(&FormValue::none(), &rules), None);
        assert_eq!(validate(&FormValue::from(""), &rules), None);
        assert_eq!(validate(&FormValue::from(false), &rules), None);
    }

    #[test]
    fn test_required() {
        let rules = RuleBuilder::new("Name").required(true).build();
        let message = Some("Name is required".to_string());

        assert_eq!(validate(&FormValue::none(), &rules), message);
        assert_eq!(validate(&FormValue::from(""), &rules), message);
        assert_eq!(validate(&FormValue::from(false), &rules), message);
        assert_eq!(validate(&FormValue::from(true), &rules), None);
        assert_eq!(validate(&FormValue::from(" "), &rules), None);
        assert_eq!(validate(&FormValue::from(0), &rules), None);
    }

    #[test]
    fn test_required_collection() {
        let rules = RuleBuilder::new("Tags").required(true).build();
        assert_eq!(
            validate(&FormValue::from(Vec::<String>::new()), &rules),
            Some("Tags is required".to_string())
        );
        assert_eq!(validate(&FormValue::from(vec!["a"]), &rules), None);

        let optional = RuleSet::none();
        assert_eq!(validate(&FormValue::from(Vec::<String>::new()), &optional), None);
    }

    #[test]
    fn test_length_counts_characters() {
        let rules = RuleBuilder::new("Code").max_length(3).build();
        assert_eq!(validate(&FormValue::from("äöü"), &rules), None);
        assert!(validate(&FormValue::from("äöüß"), &rules).is_some());
    }

    #[test]
    fn test_numeric_text_is_range_checked() {
        let rules = RuleBuilder::new("Age").min_range(18.0).max_range(120.0).build();
        assert_eq!(validate(&FormValue::from("18"), &rules), None);
        assert_eq!(validate(&FormValue::from("120"), &rules), None);
        assert_eq!(
            validate(&FormValue::from("17.5"), &rules),
            Some("Age must be between 18 and 120".to_string())
        );
        // non-numeric text skips the range check
        assert_eq!(validate(&FormValue::from("old"), &rules), None);
    }

    #[test]
    fn test_numbers_are_range_checked() {
        let rules = RuleBuilder::new("Qty").min_range(1.0).build();
        assert_eq!(validate(&FormValue::from(1), &rules), None);
        assert_eq!(validate(&FormValue::from(5i64), &rules), None);
        assert!(validate(&FormValue::from(0.5f32), &rules).is_some());
        assert!(validate(&FormValue::from(-3.0f64), &rules).is_some());
    }

    #[test]
    fn test_check_order_first_failure_wins() {
        let rules = RuleBuilder::new("Pin")
            .required(true)
            .min_length(4)
            .custom(|v| (v == "0000").then(|| "Pin too simple".to_string()))
            .digit()
            .build();

        assert_eq!(
            validate(&FormValue::from(""), &rules),
            Some("Pin is required".to_string())
        );
        assert_eq!(
            validate(&FormValue::from("abc"), &rules),
            Some("Pin must be at least 4 characters".to_string())
        );
        assert_eq!(
            validate(&FormValue::from("0000"), &rules),
            Some("Pin too simple".to_string())
        );
        assert_eq!(
            validate(&FormValue::from("abcd"), &rules),
            Some("Pin is invalid".to_string())
        );
        assert_eq!(validate(&FormValue::from("abc1"), &rules), None);
    }

    #[test]
    fn test_every_pattern_must_match() {
        let rules = RuleBuilder::new("Password")
            .digit()
            .uppercase()
            .lowercase()
            .build();

        assert_eq!(validate(&FormValue::from("Secret1"), &rules), None);
        assert_eq!(
            validate(&FormValue::from("secret1"), &rules),
            Some("Password is invalid".to_string())
        );
    }

    #[test]
    fn test_custom_only_runs_on_text() {
        let rules = RuleBuilder::new("Flag")
            .custom(|_| Some("always fails".to_string()))
            .build();
        assert_eq!(validate(&FormValue::from(true), &rules), None);
        assert_eq!(validate(&FormValue::from(3), &rules), None);
        assert!(validate(&FormValue::from("x"), &rules).is_some());
    }
}
