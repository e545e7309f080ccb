//! Whitespace stripping transformer

use crate::etl::Transformer;
use eyre::Result;

/// Remove leading and trailing whitespace, line terminators included
///
/// # Example
/// ```
/// use etl_runner::etl::Transformer;
/// use etl_runner::transform::StripTransformer;
///
/// let strip = StripTransformer::new();
/// assert_eq!(strip.transform("  hello  \n".to_string()).unwrap(), "hello");
/// ```
#[derive(Debug, Default)]
pub struct StripTransformer;

impl StripTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for StripTransformer {
    type Input = String;
    type Output = String;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        log::debug!("Strip data: {:?}", input);
        let trimmed = input.trim();
        if trimmed.len() == input.len() {
            return Ok(input);
        }
        Ok(trimmed.to_string())
    }
}
