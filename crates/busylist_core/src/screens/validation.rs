//! Field validators used by editor screens.

use regex::Regex;

/// A single field rule with a user-facing message.
pub trait Validator {
    fn message(&self) -> &str;
    fn check(&self, value: &str) -> bool;
}

/// Value must contain a non-whitespace character.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator for Required {
    fn message(&self) -> &str {
        "This field is required"
    }

    fn check(&self, value: &str) -> bool {
        required(value)
    }
}

/// Value must be non-empty and match a regular expression.
#[derive(Debug, Clone)]
pub struct Format {
    pattern: Regex,
    message: String,
}

impl Format {
    pub fn new(pattern: Regex) -> Self {
        Self::with_message(pattern, "Invalid format")
    }

    pub fn with_message(pattern: Regex, message: impl Into<String>) -> Self {
        Self {
            pattern,
            message: message.into(),
        }
    }
}

impl Validator for Format {
    fn message(&self) -> &str {
        &self.message
    }

    fn check(&self, value: &str) -> bool {
        !value.is_empty() && self.pattern.is_match(value)
    }
}

pub fn required(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{Format, Required, Validator};
    use regex::Regex;

    #[test]
    fn required_rejects_blank_values() {
        assert!(!Required.check("   "));
        assert!(!Required.check(""));
        assert!(Required.check(" x "));
        assert_eq!(Required.message(), "This field is required");
    }

    #[test]
    fn format_rejects_empty_and_non_matching_values() {
        let digits = Format::new(Regex::new(r"^\d+$").unwrap());
        assert!(!digits.check(""));
        assert!(!digits.check("12a"));
        assert!(digits.check("123"));
        assert_eq!(digits.message(), "Invalid format");
    }
}
