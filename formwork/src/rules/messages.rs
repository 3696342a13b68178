//! Message templates used when rules are built.
//!
//! Templates use `{label}`, `{min}`, `{max}` and `{target}` placeholders. A
//! catalog deserialized from a partial document keeps the English defaults
//! for every key it omits.

use serde::{Deserialize, Serialize};

/// Locale-aware rendering of numbers interpolated into messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Separator between groups of three integer digits (None = no grouping).
    pub grouping_separator: Option<char>,
    pub decimal_separator: char,
    /// Fraction digits kept after rounding; trailing zeros are trimmed.
    pub max_fraction_digits: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            grouping_separator: Some(','),
            decimal_separator: '.',
            max_fraction_digits: 3,
        }
    }
}

impl NumberFormat {
    /// Format a number, e.g. `1234.5` -> `"1,234.5"` with the defaults.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let rounded = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
        let frac_part = frac_part.trim_end_matches('0');

        let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
        let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
        if value.is_sign_negative() && !is_zero {
            out.push('-');
        }

        let digits = int_part.len();
        for (i, c) in int_part.chars().enumerate() {
            if i > 0
                && (digits - i) % 3 == 0
                && let Some(sep) = self.grouping_separator
            {
                out.push(sep);
            }
            out.push(c);
        }

        if !frac_part.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}

/// Templates for every message a rule can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    pub required: String,
    /// Length rule whose minimum and maximum are equal.
    pub length: String,
    pub min_length: String,
    pub max_length: String,
    pub min_max_length: String,
    /// Range rule whose minimum and maximum are equal.
    pub range: String,
    pub min_range: String,
    pub max_range: String,
    pub min_max_range: String,
    pub invalid: String,
    pub compare_with: String,
    pub number_format: NumberFormat,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            required: "{label} is required".into(),
            length: "{label} must be exactly {max} characters".into(),
            min_length: "{label} must be at least {min} characters".into(),
            max_length: "{label} must be at most {max} characters".into(),
            min_max_length: "{label} must be between {min} and {max} characters".into(),
            range: "{label} must be equal to {max}".into(),
            min_range: "{label} must be at least {min}".into(),
            max_range: "{label} must be at most {max}".into(),
            min_max_range: "{label} must be between {min} and {max}".into(),
            invalid: "{label} is invalid".into(),
            compare_with: "{target} did not match with {label}".into(),
            number_format: NumberFormat::default(),
        }
    }
}

/// Which message variant a bounded rule uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bounds {
    Exact,
    MinOnly,
    MaxOnly,
    Both,
}

impl Bounds {
    /// `None` when neither bound is set.
    pub(crate) fn of<T: PartialEq>(min: Option<T>, max: Option<T>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (Some(_), None) => Some(Self::MinOnly),
            (None, Some(_)) => Some(Self::MaxOnly),
            (Some(a), Some(b)) if a == b => Some(Self::Exact),
            (Some(_), Some(_)) => Some(Self::Both),
        }
    }
}

impl MessageCatalog {
    pub fn required_message(&self, label: &str) -> String {
        render(&self.required, &[("label", label)])
    }

    pub fn invalid_message(&self, label: &str) -> String {
        render(&self.invalid, &[("label", label)])
    }

    /// `target` is used as given; the builder capitalizes it first.
    pub fn compare_with_message(&self, label: &str, target: &str) -> String {
        render(&self.compare_with, &[("label", label), ("target", target)])
    }

    pub(crate) fn length_message(
        &self,
        label: &str,
        bounds: Bounds,
        min: Option<usize>,
        max: Option<usize>,
    ) -> String {
        let template = match bounds {
            Bounds::Exact => &self.length,
            Bounds::MinOnly => &self.min_length,
            Bounds::MaxOnly => &self.max_length,
            Bounds::Both => &self.min_max_length,
        };
        let min = self.number_format.format(min.unwrap_or(0) as f64);
        let max = self.number_format.format(max.unwrap_or(0) as f64);
        render(template, &[("label", label), ("min", &min), ("max", &max)])
    }

    pub(crate) fn range_message(
        &self,
        label: &str,
        bounds: Bounds,
        min: Option<f64>,
        max: Option<f64>,
    ) -> String {
        let template = match bounds {
            Bounds::Exact => &self.range,
            Bounds::MinOnly => &self.min_range,
            Bounds::MaxOnly => &self.max_range,
            Bounds::Both => &self.min_max_range,
        };
        let min = self.number_format.format(min.unwrap_or(0.0));
        let max = self.number_format.format(max.unwrap_or(0.0));
        render(template, &[("label", label), ("min", &min), ("max", &max)])
    }
}

fn render(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format_grouping() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.format(0.0), "0");
        assert_eq!(fmt.format(8.0), "8");
        assert_eq!(fmt.format(1234.0), "1,234");
        assert_eq!(fmt.format(1234567.0), "1,234,567");
        assert_eq!(fmt.format(-1234.5), "-1,234.5");
        assert_eq!(fmt.format(0.12345), "0.123");
        assert_eq!(fmt.format(-0.0001), "0");
    }

    #[test]
    fn test_number_format_european() {
        let fmt = NumberFormat {
            grouping_separator: Some('.'),
            decimal_separator: ',',
            max_fraction_digits: 2,
        };
        assert_eq!(fmt.format(1234.5), "1.234,5");

        let fmt = NumberFormat {
            grouping_separator: None,
            ..NumberFormat::default()
        };
        assert_eq!(fmt.format(1234.5), "1234.5");
    }

    #[test]
    fn test_bounds_variants() {
        assert_eq!(Bounds::of::<usize>(None, None), None);
        assert_eq!(Bounds::of(Some(1), None), Some(Bounds::MinOnly));
        assert_eq!(Bounds::of(None, Some(1)), Some(Bounds::MaxOnly));
        assert_eq!(Bounds::of(Some(2), Some(2)), Some(Bounds::Exact));
        assert_eq!(Bounds::of(Some(1), Some(2)), Some(Bounds::Both));
    }

    #[test]
    fn test_partial_catalog_keeps_defaults() {
        let catalog: MessageCatalog =
            serde_json::from_str(r#"{"required": "{label} fehlt"}"#).unwrap();
        assert_eq!(catalog.required_message("Name"), "Name fehlt");
        assert_eq!(catalog.invalid_message("Name"), "Name is invalid");
        assert_eq!(catalog.number_format, NumberFormat::default());
    }
}
