//! Scoped acquisition of stage resources

use eyre::Result;
use std::ops::{Deref, DerefMut};

/// Open/close lifecycle shared by extractors and loaders
///
/// `close` must tolerate being called after a failed or partial `open`, and
/// calling it on an already closed resource must be a no-op.
pub trait Resource {
    /// Acquire the underlying source or destination
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release whatever `open` acquired
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<R: Resource + ?Sized> Resource for Box<R> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Guard that keeps a [`Resource`] open for its lifetime
///
/// The resource is closed exactly once: by [`Scope::release`] on the normal
/// path, or on drop when the scope is left early by `?` or a panic.
pub struct Scope<'a, R: Resource + ?Sized> {
    label: &'static str,
    resource: &'a mut R,
    closed: bool,
}

impl<'a, R: Resource + ?Sized> Scope<'a, R> {
    /// Open `resource`, closing it again if the open fails half way
    pub fn open(label: &'static str, resource: &'a mut R) -> Result<Self> {
        log::debug!("Opening {}", label);
        if let Err(err) = resource.open() {
            log::error!("Failed to open {}: {:#}", label, err);
            if let Err(close_err) = resource.close() {
                log::error!("Failed to close {} after open error: {:#}", label, close_err);
            }
            return Err(err);
        }
        Ok(Self {
            label,
            resource,
            closed: false,
        })
    }

    /// Close the resource and combine the outcome with the scope body's result
    ///
    /// An error from the body takes precedence; a close error that would be
    /// masked by it is logged instead.
    pub fn release<T>(mut self, result: Result<T>) -> Result<T> {
        let closed = self.close_once();
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                log::error!("Failed to close {}: {:#}", self.label, close_err);
                Err(err)
            }
        }
    }

    fn close_once(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        log::debug!("Closing {}", self.label);
        self.resource.close()
    }
}

impl<R: Resource + ?Sized> Deref for Scope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.resource
    }
}

impl<R: Resource + ?Sized> DerefMut for Scope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.resource
    }
}

impl<R: Resource + ?Sized> Drop for Scope<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.close_once() {
            log::error!("Failed to close {}: {:#}", self.label, err);
        }
    }
}
