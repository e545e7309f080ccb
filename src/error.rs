//! Named error conditions
//!
//! Most fallible code returns [`eyre::Result`]. The variants here are the
//! conditions callers are expected to match on, usually through
//! `report.downcast_ref::<EtlError>()`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EtlError {
    /// No plugin with the requested name is registered under the namespace.
    #[error("Can not find \"{name}\" plugin in {namespace}")]
    PluginNotFound { namespace: String, name: String },

    /// A required setting has no value.
    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    /// A setting is present but can not be interpreted.
    #[error("Invalid value for setting {key}: {message}")]
    InvalidSetting { key: String, message: String },

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),
}

impl EtlError {
    pub fn plugin_not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::PluginNotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn invalid_setting(key: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_not_found_message() {
        let err = EtlError::plugin_not_found("etl.loader", "nonexistent");
        assert_eq!(
            err.to_string(),
            "Can not find \"nonexistent\" plugin in etl.loader"
        );
    }

    #[test]
    fn test_downcast_through_report() {
        let report: eyre::Report = EtlError::plugin_not_found("etl.extractor", "s3").into();
        match report.downcast_ref::<EtlError>() {
            Some(EtlError::PluginNotFound { namespace, name }) => {
                assert_eq!(namespace, "etl.extractor");
                assert_eq!(name, "s3");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
