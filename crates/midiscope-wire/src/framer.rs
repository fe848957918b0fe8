//! Status-byte framing.
//!
//! MIDI carries no length prefix. A message runs from one status byte up to,
//! but not including, the next one, so a message is only known to be complete
//! once the following status byte arrives.

use crate::byte::is_status;
use crate::error::{SourceError, StreamError};
use crate::message::RawMessage;
use crate::source::ByteSource;
use std::iter::FusedIterator;
use tracing::debug;

/// Push-style framer for arbitrarily chunked input.
#[derive(Debug, Clone, Default)]
pub struct Framer {
    pending: RawMessage,
}

impl Framer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns the message it closed, if any.
    ///
    /// A data byte with no status byte before it is still buffered. The
    /// resulting message has no leading status byte and is left for the
    /// interpreter to reject.
    pub fn push(&mut self, byte: u8) -> Option<RawMessage> {
        if is_status(byte) {
            let done = std::mem::take(&mut self.pending);
            self.pending.push(byte);
            return (!done.is_empty()).then_some(done);
        }

        if self.pending.is_empty() {
            debug!(byte, "data byte without a preceding status byte");
        }
        self.pending.push(byte);
        None
    }

    pub fn push_slice(&mut self, bytes: &[u8]) -> Vec<RawMessage> {
        bytes.iter().filter_map(|&b| self.push(b)).collect()
    }

    /// The message still waiting for its terminating status byte.
    #[inline]
    pub fn pending(&self) -> &RawMessage {
        &self.pending
    }

    /// Hand out the pending message early (used at end of stream).
    pub fn flush(&mut self) -> Option<RawMessage> {
        let done = std::mem::take(&mut self.pending);
        (!done.is_empty()).then_some(done)
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Frame a byte source into a lazy stream of raw messages.
pub fn frame<S: ByteSource>(source: S) -> Frames<S> {
    Frames::new(source)
}

/// Pull iterator over the messages of a [`ByteSource`].
///
/// Logically infinite: it only ends when the source fails. On end-of-stream the
/// pending message is flushed first, then the [`StreamError`] is yielded, then
/// the iterator is exhausted. Any other source error is yielded immediately and
/// the partial message is dropped.
#[derive(Debug)]
pub struct Frames<S> {
    source: S,
    framer: Framer,
    deferred: Option<StreamError>,
    finished: bool,
}

impl<S: ByteSource> Frames<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            framer: Framer::new(),
            deferred: None,
            finished: false,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: ByteSource> Iterator for Frames<S> {
    type Item = Result<RawMessage, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.deferred.take() {
            return Some(Err(err));
        }
        if self.finished {
            return None;
        }

        loop {
            match self.source.read_byte() {
                Ok(byte) => {
                    if let Some(msg) = self.framer.push(byte) {
                        return Some(Ok(msg));
                    }
                }
                Err(SourceError::EndOfStream) => {
                    self.finished = true;
                    let err = StreamError::from(SourceError::EndOfStream);
                    return match self.framer.flush() {
                        Some(msg) => {
                            self.deferred = Some(err);
                            Some(Ok(msg))
                        }
                        None => Some(Err(err)),
                    };
                }
                Err(e) => {
                    self.finished = true;
                    if !self.framer.pending().is_empty() {
                        debug!(pending = %self.framer.pending(), "dropping partial message");
                    }
                    self.framer.reset();
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

impl<S: ByteSource> FusedIterator for Frames<S> {}
