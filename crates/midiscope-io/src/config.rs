//! Device source configuration.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DEVICE: &str = "/dev/midi1";

/// How a MIDI device file is opened and streamed.
///
/// # Example
/// ```
/// use midiscope_io::DeviceConfig;
/// use std::time::Duration;
///
/// let config = DeviceConfig {
///     path: "/dev/midi2".into(),
///     retry_wait: Duration::from_secs(5),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub path: PathBuf,

    /// Wait between open attempts. Default: 2s
    pub retry_wait: Duration,

    /// Bytes per `read` call. Default: 1024
    pub read_chunk: usize,

    /// Chunks buffered between the reader thread and the consumer. Default: 64
    pub channel_capacity: usize,

    /// How often a blocked consumer checks for cancellation. Default: 100ms
    pub poll_interval: Duration,

    /// Keep retrying the open, and reopen after read errors. Default: true
    pub reconnect: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DEVICE),
            retry_wait: Duration::from_secs(2),
            read_chunk: 1024,
            channel_capacity: 64,
            poll_interval: Duration::from_millis(100),
            reconnect: true,
        }
    }
}

impl DeviceConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.read_chunk == 0 {
            return Err(Error::InvalidConfig("read_chunk must be > 0".into()));
        }
        if self.channel_capacity == 0 {
            return Err(Error::InvalidConfig("channel_capacity must be > 0".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll_interval must be > 0".into()));
        }
        if self.reconnect && self.retry_wait.is_zero() {
            return Err(Error::InvalidConfig(
                "retry_wait must be > 0 when reconnecting".into(),
            ));
        }
        Ok(())
    }
}
