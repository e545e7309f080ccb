//! Text encodings for line-oriented stages

use crate::error::EtlError;

use eyre::Result;
use std::fmt;

/// Encoding used to decode source bytes and encode destination text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1, one byte per code point below U+0100
    Latin1,
}

impl TextEncoding {
    /// Resolve an encoding label such as `utf-8` or `ISO-8859-1`
    pub fn from_label(label: &str) -> Result<Self, EtlError> {
        match label.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(EtlError::UnsupportedEncoding(label.to_string())),
        }
    }

    pub fn decode(self, bytes: Vec<u8>) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes).map_err(|e| eyre::eyre!("Invalid UTF-8: {}", e)),
            Self::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        eyre::eyre!("Character {:?} can not be encoded as latin-1", c)
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Latin1 => write!(f, "latin-1"),
        }
    }
}
