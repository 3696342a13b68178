//! Tests for rule building and message resolution.

use std::sync::Arc;

use formwork::form::FormConfig;
use formwork::rules::{MessageCatalog, NumberFormat, RuleBuilder};
use formwork::validator::validate;
use formwork::value::FormValue;
use regex::Regex;

#[test]
fn test_length_messages() {
    let exact = RuleBuilder::new("Pin").min_length(4).max_length(4).build();
    assert_eq!(exact.length.unwrap().message, "Pin must be exactly 4 characters");

    let min = RuleBuilder::new("Pin").min_length(4).build();
    assert_eq!(min.length.unwrap().message, "Pin must be at least 4 characters");

    let max = RuleBuilder::new("Pin").max_length(8).build();
    assert_eq!(max.length.unwrap().message, "Pin must be at most 8 characters");

    let both = RuleBuilder::new("Pin").min_length(4).max_length(8).build();
    assert_eq!(
        both.length.unwrap().message,
        "Pin must be between 4 and 8 characters"
    );
}

#[test]
fn test_range_messages() {
    let exact = RuleBuilder::new("Answer").min_range(42.0).max_range(42.0).build();
    assert_eq!(exact.range.unwrap().message, "Answer must be equal to 42");

    let min = RuleBuilder::new("Price").min_range(0.5).build();
    assert_eq!(min.range.unwrap().message, "Price must be at least 0.5");

    let max = RuleBuilder::new("Quantity").max_range(1000.0).build();
    assert_eq!(max.range.unwrap().message, "Quantity must be at most 1,000");

    let both = RuleBuilder::new("Age").min_range(18.0).max_range(120.0).build();
    assert_eq!(both.range.unwrap().message, "Age must be between 18 and 120");
}

#[test]
fn test_unset_rules_are_absent() {
    let rules = RuleBuilder::new("Anything").build();
    assert!(rules.required.is_none());
    assert!(rules.length.is_none());
    assert!(rules.range.is_none());
    assert!(rules.pattern.is_none());
    assert!(rules.compare_with.is_none());
    assert!(rules.compare_for.is_none());
    assert!(rules.custom.is_none());

    let rules = RuleBuilder::new("Anything").required(false).build();
    assert!(rules.required.is_none());
}

#[test]
fn test_compare_with_message() {
    let rules = RuleBuilder::new("Confirm password *")
        .compare_with("password")
        .build();
    let rule = rules.compare_with.unwrap();
    assert_eq!(rule.target, "password");
    assert_eq!(rule.message, "Password did not match with Confirm password");
}

#[test]
fn test_required_if_not_empty_builds_conditional_rule() {
    let rules = RuleBuilder::new("Extension")
        .required_if_not_empty(["phone"])
        .build();
    let required = rules.required.unwrap();
    assert!(required.is_conditional());
    assert_eq!(required.required_if_not_empty, vec!["phone"]);
    assert_eq!(required.message, "Extension is required");
}

#[test]
fn test_custom_catalog() {
    let catalog: MessageCatalog = serde_json::from_str(
        r#"{
            "required": "{label} ist erforderlich",
            "min_max_length": "{label} muss zwischen {min} und {max} Zeichen lang sein",
            "max_range": "{label} darf höchstens {max} sein",
            "number_format": { "grouping_separator": ".", "decimal_separator": "," }
        }"#,
    )
    .unwrap();
    let config = FormConfig::new().catalog(catalog);

    let rules = config
        .rules("Passwort")
        .required(true)
        .min_length(4)
        .max_length(8)
        .build();
    assert_eq!(rules.required.unwrap().message, "Passwort ist erforderlich");
    assert_eq!(
        rules.length.unwrap().message,
        "Passwort muss zwischen 4 und 8 Zeichen lang sein"
    );

    let rules = config.rules("Betrag").max_range(1234.5).build();
    assert_eq!(rules.range.unwrap().message, "Betrag darf höchstens 1.234,5 sein");

    // keys missing from the document keep their defaults
    let rules = config.rules("E-Mail").email().build();
    assert_eq!(rules.pattern.unwrap().message, "E-Mail is invalid");
}

#[test]
fn test_shared_catalog() {
    let catalog = Arc::new(MessageCatalog {
        invalid: "Please check {label}".into(),
        ..MessageCatalog::default()
    });
    let rules = RuleBuilder::with_catalog("Name", Arc::clone(&catalog))
        .pattern(Regex::new("^[a-z]+$").unwrap())
        .build();
    assert_eq!(rules.pattern.unwrap().message, "Please check Name");
}

#[test]
fn test_number_format_in_length() {
    let catalog = MessageCatalog {
        number_format: NumberFormat {
            grouping_separator: Some(' '),
            ..NumberFormat::default()
        },
        ..MessageCatalog::default()
    };
    let rules = RuleBuilder::with_catalog("Essay", Arc::new(catalog))
        .max_length(10000)
        .build();
    assert_eq!(
        rules.length.unwrap().message,
        "Essay must be at most 10 000 characters"
    );
}

#[test]
fn test_email_rule() {
    let rules = RuleBuilder::new("Email").required(true).email().build();
    assert_eq!(validate(&FormValue::from("a@b.c"), &rules), None);
    assert_eq!(validate(&FormValue::from("me@example.com"), &rules), None);
    assert_eq!(
        validate(&FormValue::from("abc"), &rules),
        Some("Email is invalid".to_string())
    );
    assert_eq!(
        validate(&FormValue::from("a@"), &rules),
        Some("Email is invalid".to_string())
    );
    assert_eq!(
        validate(&FormValue::none(), &rules),
        Some("Email is required".to_string())
    );
}

#[test]
fn test_pattern_must_cover_whole_value() {
    let rules = RuleBuilder::new("Code")
        .pattern(Regex::new("[0-9]+").unwrap())
        .build();
    assert_eq!(validate(&FormValue::from("123"), &rules), None);
    assert_eq!(
        validate(&FormValue::from("abc123xyz"), &rules),
        Some("Code is invalid".to_string())
    );
    assert_eq!(
        validate(&FormValue::from("123\n"), &rules),
        Some("Code is invalid".to_string())
    );
}

#[test]
fn test_rules_survive_builder_drop() {
    let rules = {
        let builder = RuleBuilder::new("Code").custom(|v| {
            (!v.starts_with("X-")).then(|| "Code must start with X-".to_string())
        });
        builder.build()
    };
    assert_eq!(validate(&FormValue::from("X-1"), &rules), None);
    assert_eq!(
        validate(&FormValue::from("Y-1"), &rules),
        Some("Code must start with X-".to_string())
    );
}
