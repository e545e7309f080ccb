//! Regular expression replacement transformer

use crate::error::EtlError;
use crate::etl::Transformer;
use crate::settings::Settings;

use eyre::Result;
use regex::Regex;

pub const REGEX_PATTERN: &str = "REGEX_PATTERN";
pub const REGEX_REPLACEMENT: &str = "REGEX_REPLACEMENT";

/// Replace every match of a pattern in each record
///
/// The replacement may refer to capture groups as `$1` or `${name}`.
pub struct RegexReplacer {
    pattern: Regex,
    replacement: String,
}

impl RegexReplacer {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, EtlError> {
        let pattern =
            Regex::new(pattern).map_err(|e| EtlError::invalid_setting(REGEX_PATTERN, e))?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }

    /// Build from `REGEX_PATTERN` (required) and `REGEX_REPLACEMENT` (default empty)
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let pattern = settings.require(REGEX_PATTERN)?;
        let replacement = settings.get_or(REGEX_REPLACEMENT, "");
        Ok(Self::new(pattern, replacement)?)
    }
}

impl Transformer for RegexReplacer {
    type Input = String;
    type Output = String;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(self
            .pattern
            .replace_all(&input, self.replacement.as_str())
            .into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all() {
        let replacer = RegexReplacer::new(r"(\w+)@example\.com", "$1@example.org").unwrap();
        let output = replacer
            .transform("ann@example.com, bob@example.com".to_string())
            .unwrap();
        assert_eq!(output, "ann@example.org, bob@example.org");
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::from_pairs([("REGEX_PATTERN", r"\s+")]);
        let replacer = RegexReplacer::from_settings(&settings).unwrap();
        assert_eq!(replacer.transform("a b\tc".to_string()).unwrap(), "abc");

        assert!(RegexReplacer::from_settings(&Settings::default()).is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            RegexReplacer::new("(unclosed", ""),
            Err(EtlError::InvalidSetting { .. })
        ));
    }
}
