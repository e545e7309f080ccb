//! Extractor trait for lazy data extraction

use super::Resource;
use eyre::Result;

/// Lazy, single-pass sequence of extracted records
///
/// Each element is produced on demand, so a consumer can start working before
/// the source has been fully read and can stop early by dropping the iterator.
pub type Records<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Extractor trait for extracting records from a source
///
/// The source is acquired in [`Resource::open`] and released in
/// [`Resource::close`]; [`Extractor::extract`] is only called in between.
///
/// # Example
/// ```
/// use etl_runner::etl::{Extractor, Records, Resource};
/// use eyre::Result;
///
/// struct Numbers(Vec<i32>);
///
/// impl Resource for Numbers {}
///
/// impl Extractor for Numbers {
///     type Item = i32;
///
///     fn extract(&mut self) -> Result<Records<'_, Self::Item>> {
///         Ok(Box::new(self.0.iter().copied().map(Ok)))
///     }
/// }
///
/// let mut numbers = Numbers(vec![1, 2, 3]);
/// let items: Vec<i32> = numbers.extract().unwrap().map(|r| r.unwrap()).collect();
/// assert_eq!(items, vec![1, 2, 3]);
/// ```
pub trait Extractor: Resource {
    /// The type of items extracted
    type Item;

    /// Start streaming records from the opened source
    ///
    /// # Errors
    /// Returns an error if the stream can not be started; errors reading an
    /// individual record are reported as an `Err` element of the sequence.
    fn extract(&mut self) -> Result<Records<'_, Self::Item>>;
}

impl<E: Extractor + ?Sized> Extractor for Box<E> {
    type Item = E::Item;

    fn extract(&mut self) -> Result<Records<'_, Self::Item>> {
        (**self).extract()
    }
}
