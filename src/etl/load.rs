//! Loader trait for loading data to destinations

use super::Resource;
use eyre::Result;

/// Loader trait for loading records to a destination
///
/// The destination is acquired in [`Resource::open`] and released in
/// [`Resource::close`]. Whether a loaded record is visible right away or
/// buffered until close is up to the implementation; the file-backed loaders
/// in this crate flush on every write.
///
/// # Example
/// ```
/// use etl_runner::etl::{Loader, Resource};
/// use eyre::Result;
///
/// #[derive(Default)]
/// struct Collect(Vec<String>);
///
/// impl Resource for Collect {}
///
/// impl Loader for Collect {
///     type Item = String;
///
///     fn load(&mut self, item: Self::Item) -> Result<()> {
///         self.0.push(item);
///         Ok(())
///     }
/// }
/// ```
pub trait Loader: Resource {
    /// The type of items to load
    type Item;

    /// Load a single record to the destination
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, validation, etc.)
    fn load(&mut self, item: Self::Item) -> Result<()>;
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    type Item = L::Item;

    fn load(&mut self, item: Self::Item) -> Result<()> {
        (**self).load(item)
    }
}
