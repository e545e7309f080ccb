//! Transformer trait for data transformation

use eyre::Result;

/// Transformer trait for transforming records one at a time
///
/// A transformer holds no external resource. It is a function of its input
/// and the configuration it was built with, and it must not keep the input
/// beyond the call.
///
/// # Example
/// ```
/// use etl_runner::etl::Transformer;
/// use eyre::Result;
///
/// struct Upper;
///
/// impl Transformer for Upper {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.to_uppercase())
///     }
/// }
///
/// assert_eq!(Upper.transform("abc".to_string()).unwrap(), "ABC");
/// ```
pub trait Transformer {
    /// Input item type
    type Input;

    /// Output item type after transformation
    type Output;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items, stopping at the first failure
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}

impl<T: Transformer + ?Sized> Transformer for Box<T> {
    type Input = T::Input;
    type Output = T::Output;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        (**self).transform(input)
    }
}

impl<T: Transformer + ?Sized> Transformer for &T {
    type Input = T::Input;
    type Output = T::Output;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        (**self).transform(input)
    }
}

/// Identity transformer that passes items through unchanged
pub struct IdentityTransformer<T> {
    _phantom: std::marker::PhantomData<fn(T) -> T>,
}

impl<T> Default for IdentityTransformer<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> IdentityTransformer<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Transformer for IdentityTransformer<T> {
    type Input = T;
    type Output = T;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transformer() {
        let transformer = IdentityTransformer::<i32>::new();
        let input = vec![1, 2, 3];
        let output = transformer.transform_many(input.clone()).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn test_transform_many_stops_at_failure() {
        struct Positive;

        impl Transformer for Positive {
            type Input = i32;
            type Output = u32;

            fn transform(&self, input: i32) -> Result<u32> {
                u32::try_from(input).map_err(|_| eyre::eyre!("negative: {}", input))
            }
        }

        assert_eq!(Positive.transform_many(vec![1, 2]).unwrap(), vec![1, 2]);
        let err = Positive.transform_many(vec![1, -2, -3]).unwrap_err();
        assert_eq!(err.to_string(), "negative: -2");
    }
}
