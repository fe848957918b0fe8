//! Error types for the MIDI wire decoder.

use crate::message::RawMessage;
use std::io;
use thiserror::Error;

/// Why a framed message could not be turned into an event.
///
/// Every variant is recoverable: skip the message and keep reading. A malformed
/// message never reparses differently, so retrying is pointless.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty message")]
    Empty,

    #[error("unknown command kind {0:#x}")]
    UnknownCommand(u8),

    #[error("expected {expected} data bytes, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}

/// Failure reported by a [`ByteSource`](crate::ByteSource).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("end of stream")]
    EndOfStream,

    #[error("read cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The byte stream terminated. Nothing more will be framed from it.
#[derive(Error, Debug)]
#[error("byte stream terminated: {0}")]
pub struct StreamError(#[from] SourceError);

impl StreamError {
    pub fn cause(&self) -> &SourceError {
        &self.0
    }

    pub fn into_cause(self) -> SourceError {
        self.0
    }

    #[inline]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.0, SourceError::EndOfStream)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.0, SourceError::Cancelled)
    }
}

/// Anything the composed framer + interpreter pipeline can yield.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot decode [{raw}]: {error}")]
    Decode {
        raw: RawMessage,
        #[source]
        error: DecodeError,
    },

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl Error {
    /// Stream errors end the pipeline; decode errors only cost one message.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Stream(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
