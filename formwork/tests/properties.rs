//! Property tests for the validator.

use formwork::form::{Form, FormConfig};
use formwork::rules::{RuleBuilder, RuleSet};
use formwork::validator::validate;
use formwork::value::FormValue;
use formwork::widgets::Input;
use proptest::prelude::*;

proptest! {
    #[test]
    fn length_rule_matches_char_count(
        text in "\\PC{0,20}",
        min in 0usize..10,
        extra in 0usize..10,
    ) {
        let max = min + extra;
        let rules = RuleBuilder::new("Field").min_length(min).max_length(max).build();
        let len = text.chars().count();

        let error = validate(&FormValue::from(text.as_str()), &rules);
        prop_assert_eq!(error.is_none(), (min..=max).contains(&len));
    }

    #[test]
    fn range_rule_is_inclusive(
        value in -1000i32..1000,
        min in -500i32..500,
        span in 0i32..500,
    ) {
        let max = min + span;
        let rules = RuleBuilder::new("Field")
            .min_range(f64::from(min))
            .max_range(f64::from(max))
            .build();
        let expected = (min..=max).contains(&value);

        prop_assert_eq!(validate(&FormValue::from(value), &rules).is_none(), expected);
        // numeric text is checked the same way
        let text = value.to_string();
        prop_assert_eq!(validate(&FormValue::from(text.as_str()), &rules).is_none(), expected);
    }

    #[test]
    fn required_fails_only_when_empty(text in "\\PC{0,8}") {
        let rules = RuleBuilder::new("Field").required(true).build();
        let error = validate(&FormValue::from(text.as_str()), &rules);
        prop_assert_eq!(error.is_some(), text.is_empty());
    }

    #[test]
    fn no_rules_never_fail(text in "\\PC{0,20}", number in any::<i64>(), flag in any::<bool>()) {
        let rules = RuleSet::none();
        prop_assert!(validate(&FormValue::from(text), &rules).is_none());
        prop_assert!(validate(&FormValue::from(number), &rules).is_none());
        prop_assert!(validate(&FormValue::from(flag), &rules).is_none());
    }

    #[test]
    fn form_validate_agrees_with_validator(
        texts in proptest::collection::vec("[a-z]{0,6}", 1..6),
    ) {
        let form = Form::new(FormConfig::new());
        let rules = RuleBuilder::new("Field").required(true).min_length(3).build();

        for (i, text) in texts.iter().enumerate() {
            form.register_input(format!("f{i}"), rules.clone(), Input::with_value(text.as_str()))
                .unwrap();
        }

        let expected = texts.iter().all(|text| {
            let value = if text.is_empty() { FormValue::none() } else { FormValue::from(text.as_str()) };
            validate(&value, &rules).is_none()
        });
        let result = form.validate_all();
        prop_assert_eq!(result.is_valid(), expected);
        prop_assert_eq!(form.validate(), expected);
    }
}
