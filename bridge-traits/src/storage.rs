//! Storage Abstractions
//!
//! Sequential byte sources read by the streaming core. A source is a raw
//! stream of interleaved little-endian 16-bit samples; the core never parses
//! a container format.

use crate::error::Result;

/// An open, seekable byte source.
///
/// Mirrors the small subset of a file API the streaming core needs. The
/// handle is owned by exactly one player at a time and is consumed by
/// [`close`](SourceHandle::close).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SourceHandle;
///
/// fn drain(mut source: Box<dyn SourceHandle>) -> usize {
///     let mut buf = [0u8; 512];
///     let mut total = 0;
///     while source.available() {
///         total += source.read(&mut buf).unwrap_or(0);
///     }
///     source.close();
///     total
/// }
/// ```
pub trait SourceHandle: Send {
    /// Read up to `dst.len()` bytes into `dst`, returning how many were read.
    ///
    /// A short count is only expected near the end of the source.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Returns `true` while unread bytes remain.
    fn available(&self) -> bool;

    /// Move the read position to an absolute byte offset.
    fn seek(&mut self, offset: u64) -> Result<()>;

    /// Total length of the source in bytes, as of open time.
    fn size(&self) -> u64;

    /// Release the underlying handle.
    fn close(self: Box<Self>);
}

/// Resolves source names into open handles.
pub trait SourceOpener: Send + Sync {
    /// Open `name` for sequential reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or the device fails.
    fn open(&self, name: &str) -> Result<Box<dyn SourceHandle>>;
}
