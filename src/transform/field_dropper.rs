//! Field dropper transformer
//!
//! Removes specified top-level fields from records holding a JSON document.

use crate::etl::Transformer;
use crate::settings::Settings;

use eyre::{Context, Result};
use serde_json::Value;

/// Setting listing the fields to drop, comma separated
pub const DROP_FIELDS: &str = "DROP_FIELDS";

/// Transformer that drops specified fields from JSON object records
///
/// Records that parse to something other than an object pass through
/// re-serialized but otherwise unchanged.
///
/// # Example
/// ```
/// use etl_runner::transform::FieldDropper;
/// use etl_runner::etl::Transformer;
///
/// let dropper = FieldDropper::new(vec!["created_at", "version"]);
/// let output = dropper
///     .transform(r#"{"id":"test","created_at":"2024-01-01","version":"1.0"}"#.to_string())
///     .unwrap();
/// assert_eq!(output, r#"{"id":"test"}"#);
/// ```
pub struct FieldDropper {
    fields: Vec<String>,
}

impl FieldDropper {
    /// Create a new field dropper with the specified fields to remove
    pub fn new(fields: Vec<&str>) -> Self {
        Self {
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let fields = settings.get_list(DROP_FIELDS);
        if fields.is_empty() {
            log::warn!("{} is empty, drop_fields will not remove anything", DROP_FIELDS);
        }
        Ok(Self { fields })
    }
}

impl Transformer for FieldDropper {
    type Input = String;
    type Output = String;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let mut value: Value = serde_json::from_str(&input)
            .with_context(|| format!("Failed to parse JSON record: {}", input.trim_end()))?;
        if let Some(obj) = value.as_object_mut() {
            for field in &self.fields {
                obj.remove(field);
            }
        }
        Ok(serde_json::to_string(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drop_fields() {
        let dropper = FieldDropper::new(vec!["created_at", "version"]);
        let input = json!({
            "id": "test",
            "created_at": "2024-01-01",
            "version": "1.0",
            "title": "My Object"
        });

        let output = dropper.transform(input.to_string()).unwrap();
        let output: Value = serde_json::from_str(&output).unwrap();
        let obj = output.as_object().unwrap();

        assert!(!obj.contains_key("created_at"));
        assert!(!obj.contains_key("version"));
        assert_eq!(output["id"], "test");
        assert_eq!(output["title"], "My Object");
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::from_pairs([("DROP_FIELDS", "secret, token")]);
        let dropper = FieldDropper::from_settings(&settings).unwrap();
        let output = dropper
            .transform(r#"{"user":"ann","secret":"x","token":"y"}"#.to_string())
            .unwrap();
        assert_eq!(output, r#"{"user":"ann"}"#);
    }

    #[test]
    fn test_non_object_passes_through() {
        let dropper = FieldDropper::new(vec!["a"]);
        assert_eq!(dropper.transform("[1, 2]\n".to_string()).unwrap(), "[1,2]");
    }

    #[test]
    fn test_invalid_json() {
        let dropper = FieldDropper::new(vec!["a"]);
        let err = dropper.transform("nope".to_string()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON record"));
    }
}
