//! Error type for the midiscope umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Wire(#[from] midiscope_wire::Error),

    #[error("Device: {0}")]
    Device(#[from] midiscope_io::Error),

    #[error("no byte source configured")]
    NoSource,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<midiscope_wire::StreamError> for Error {
    fn from(e: midiscope_wire::StreamError) -> Self {
        Error::Wire(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
