//! Abstraction over where bytes come from.
//!
//! The decoder pulls one byte at a time and blocks until it arrives. Live
//! device implementations (with retry and cancellation) live in
//! `midiscope-io`; this module only carries the trait and an in-memory source.

use crate::error::SourceError;

/// Sequential provider of raw bytes.
///
/// `read_byte` blocks until a byte is available. Returning an error ends the
/// stream for good: the framer never calls it again afterwards.
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<u8, SourceError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, SourceError> {
        (**self).read_byte()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    #[inline]
    fn read_byte(&mut self) -> Result<u8, SourceError> {
        (**self).read_byte()
    }
}

/// Bytes from memory. Reports end-of-stream once drained.
#[derive(Debug, Clone, Default)]
pub struct SliceSource {
    bytes: Vec<u8>,
    pos: usize,
}

impl SliceSource {
    pub fn new(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

impl From<Vec<u8>> for SliceSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl ByteSource for SliceSource {
    fn read_byte(&mut self) -> Result<u8, SourceError> {
        let byte = *self.bytes.get(self.pos).ok_or(SourceError::EndOfStream)?;
        self.pos += 1;
        Ok(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_drains_then_ends() {
        let mut source = SliceSource::new(&[0x90, 60]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.read_byte().unwrap(), 0x90);
        assert_eq!(source.read_byte().unwrap(), 60);
        assert!(matches!(source.read_byte(), Err(SourceError::EndOfStream)));
        assert!(matches!(source.read_byte(), Err(SourceError::EndOfStream)));
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn ByteSource> = Box::new(SliceSource::new(&[1]));
        assert_eq!(source.read_byte().unwrap(), 1);
    }
}
