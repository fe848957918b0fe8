//! Opening MIDI device files.
//!
//! A keyboard may be unplugged when we start, so opening keeps retrying until
//! it succeeds or is cancelled.

use crate::cancel::CancelToken;
use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::reader::ReaderSource;
use std::fs::File;
use tracing::{info, warn};

/// Opens the configured device, retrying every `retry_wait` while
/// `reconnect` is enabled.
#[derive(Debug, Clone)]
pub struct DeviceOpener {
    config: DeviceConfig,
    cancel: CancelToken,
}

impl DeviceOpener {
    pub fn new(config: DeviceConfig, cancel: CancelToken) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, cancel })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Single attempt, no retry.
    pub fn open_once(&self) -> Result<File> {
        File::open(&self.config.path).map_err(|source| Error::DeviceOpen {
            path: self.config.path.clone(),
            source,
        })
    }

    /// Block until the device opens.
    ///
    /// Without `reconnect` the first failure is returned. With it, failures are
    /// logged and retried until success or cancellation.
    pub fn open(&self) -> Result<File> {
        let mut attempts = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            match self.open_once() {
                Ok(file) => {
                    info!(path = %self.config.path.display(), "opened MIDI device");
                    return Ok(file);
                }
                Err(e) if !self.config.reconnect => return Err(e),
                Err(e) => {
                    attempts += 1;
                    warn!(
                        attempts,
                        retry_in = ?self.config.retry_wait,
                        "{e} ... waiting and trying again"
                    );
                    if !self
                        .cancel
                        .sleep(self.config.retry_wait, self.config.poll_interval)
                    {
                        return Err(Error::Cancelled);
                    }
                }
            }
        }
    }

    /// Open and wrap in a blocking byte source.
    pub fn open_source(&self) -> Result<ReaderSource<File>> {
        let file = self.open()?;
        Ok(ReaderSource::with_chunk_size(file, self.config.read_chunk))
    }
}
