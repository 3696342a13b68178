//! Built-in patterns.
//!
//! A regex matcher accepts a value only when a match covers all of it, so
//! presence checks such as [`DIGIT`] are written as `.*X.*`.

use email_address::EmailAddress;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

pub static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z.]+$").expect("NAME pattern compiles"));

pub static FULL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z. ]+$").expect("FULL_NAME pattern compiles"));

pub static DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s).*\d.*").expect("DIGIT pattern compiles"));

pub static UPPERCASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s).*[A-Z].*").expect("UPPERCASE pattern compiles"));

pub static LOWERCASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s).*[a-z].*").expect("LOWERCASE pattern compiles"));

/// One entry of a pattern rule.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Must match the whole value. Build with [`Matcher::whole`].
    Regex(Regex),
    /// Address syntax check (RFC 5322 local part, hostname domain).
    Email,
}

impl Matcher {
    /// Match `re` against the whole value, anchored as `^(?:...)$`.
    pub fn whole(re: &Regex) -> Self {
        let anchored = format!("^(?:{})$", re.as_str());
        match Regex::new(&anchored) {
            Ok(anchored) => Matcher::Regex(anchored),
            Err(e) => {
                warn!("Could not anchor pattern {:?}: {}", re.as_str(), e);
                Matcher::Regex(re.clone())
            }
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Regex(re) => re
                .find(value)
                .is_some_and(|m| m.start() == 0 && m.end() == value.len()),
            Matcher::Email => EmailAddress::is_valid(value),
        }
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Matcher::whole(&re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_matcher() {
        assert!(Matcher::Email.matches("a@b.c"));
        assert!(Matcher::Email.matches("first.last@example.com"));
        assert!(!Matcher::Email.matches("not-an-email"));
        assert!(!Matcher::Email.matches("@example.com"));
    }

    #[test]
    fn test_presence_patterns() {
        let digit = Matcher::from(DIGIT.clone());
        assert!(digit.matches("abc1"));
        assert!(digit.matches("line one\nline 2"));
        assert!(!digit.matches("abc"));

        let upper = Matcher::from(UPPERCASE.clone());
        assert!(upper.matches("aBc"));
        assert!(!upper.matches("abc"));

        let lower = Matcher::from(LOWERCASE.clone());
        assert!(lower.matches("ABc"));
        assert!(!lower.matches("ABC"));
    }

    #[test]
    fn test_regex_must_cover_value() {
        let number = Matcher::whole(&Regex::new("[0-9]+").unwrap());
        assert!(number.matches("123"));
        assert!(!number.matches("abc123xyz"));
        assert!(!number.matches("123 "));

        // leftmost branch "a" alone would only cover part of "ab"
        let either = Matcher::whole(&Regex::new("a|ab").unwrap());
        assert!(either.matches("ab"));
        assert!(either.matches("a"));
        assert!(!either.matches("abc"));
    }

    #[test]
    fn test_name_patterns() {
        assert!(NAME.is_match("J.Doe"));
        assert!(!NAME.is_match("J Doe"));
        assert!(FULL_NAME.is_match("J. Doe"));
        assert!(!FULL_NAME.is_match("J. Doe 3"));
    }
}
