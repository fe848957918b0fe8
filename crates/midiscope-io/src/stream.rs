//! Background device reader.
//!
//! ```text
//! ┌──────────────────┐  bounded(channel_capacity)  ┌──────────────┐
//! │ reader thread    │ ──── Result<Vec<u8>> ─────▶ │ DeviceStream │ ──▶ framer
//! │ open/read/reopen │                             │ (ByteSource) │
//! └──────────────────┘                             └──────────────┘
//! ```
//!
//! The reader thread owns the device file. It opens with retry, reads
//! `read_chunk` bytes at a time and forwards each chunk. The consumer side
//! hands bytes out one at a time and waits at most `poll_interval` between
//! cancellation checks.

use crate::cancel::CancelToken;
use crate::config::DeviceConfig;
use crate::device::DeviceOpener;
use crate::error::{Error, Result};
use arc_swap::ArcSwap;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use midiscope_wire::{ByteSource, SourceError};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

type Chunk = std::result::Result<Vec<u8>, SourceError>;

#[derive(Debug, Default)]
struct StatusInner {
    connected: AtomicBool,
    device: ArcSwap<Option<PathBuf>>,
    opens: AtomicUsize,
}

/// Connection state published by the reader thread.
#[derive(Debug, Clone, Default)]
pub struct StreamStatus {
    inner: Arc<StatusInner>,
}

impl StreamStatus {
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Path of the currently open device, if any.
    pub fn device(&self) -> Option<PathBuf> {
        Option::clone(&self.inner.device.load())
    }

    /// Successful opens so far. Anything above 1 is a reconnect.
    pub fn opens(&self) -> usize {
        self.inner.opens.load(Ordering::SeqCst)
    }

    fn set_connected(&self, path: PathBuf) {
        self.inner.device.store(Arc::new(Some(path)));
        self.inner.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.connected.store(true, Ordering::SeqCst);
    }

    fn set_disconnected(&self) {
        self.inner.connected.store(false, Ordering::SeqCst);
        self.inner.device.store(Arc::new(None));
    }
}

/// Live byte source backed by a reader thread.
///
/// Dropping the stream stops the thread at its next cancellation check. The
/// thread is detached; a read blocked inside the kernel is not interrupted.
#[derive(Debug)]
pub struct DeviceStream {
    receiver: Receiver<Chunk>,
    current: Vec<u8>,
    pos: usize,
    cancel: CancelToken,
    stop: CancelToken,
    poll_interval: Duration,
    status: StreamStatus,
}

impl DeviceStream {
    /// Spawn the reader thread. Returns immediately; the device may not be
    /// open yet.
    pub fn spawn(config: DeviceConfig, cancel: CancelToken) -> Result<Self> {
        let stop = cancel.child();
        let opener = DeviceOpener::new(config.clone(), stop.clone())?;
        let (sender, receiver) = bounded(config.channel_capacity);
        let status = StreamStatus::default();

        let worker = ReaderThread {
            opener,
            sender,
            stop: stop.clone(),
            status: status.clone(),
            chunk: config.read_chunk,
            poll_interval: config.poll_interval,
            reconnect: config.reconnect,
        };

        thread::Builder::new()
            .name("midiscope-reader".to_string())
            .spawn(move || worker.run())?;

        Ok(Self {
            receiver,
            current: Vec::new(),
            pos: 0,
            cancel,
            stop,
            poll_interval: config.poll_interval,
            status,
        })
    }

    pub fn status(&self) -> &StreamStatus {
        &self.status
    }
}

impl ByteSource for DeviceStream {
    fn read_byte(&mut self) -> std::result::Result<u8, SourceError> {
        loop {
            if let Some(&byte) = self.current.get(self.pos) {
                self.pos += 1;
                return Ok(byte);
            }
            if self.cancel.is_cancelled() {
                self.stop.cancel();
                return Err(SourceError::Cancelled);
            }
            match self.receiver.recv_timeout(self.poll_interval) {
                Ok(Ok(chunk)) => {
                    self.current = chunk;
                    self.pos = 0;
                }
                Ok(Err(e)) => return Err(e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(SourceError::EndOfStream),
            }
        }
    }
}

impl Drop for DeviceStream {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

struct ReaderThread {
    opener: DeviceOpener,
    sender: Sender<Chunk>,
    stop: CancelToken,
    status: StreamStatus,
    chunk: usize,
    poll_interval: Duration,
    reconnect: bool,
}

impl ReaderThread {
    fn run(self) {
        let mut buf = vec![0u8; self.chunk];

        'device: loop {
            let mut file = match self.opener.open() {
                Ok(file) => file,
                Err(Error::Cancelled) => break,
                Err(e) => {
                    self.forward(Err(open_failure(e)));
                    break;
                }
            };
            self.status.set_connected(self.opener.config().path.clone());

            loop {
                if self.stop.is_cancelled() {
                    break 'device;
                }
                match read_chunk(&mut file, &mut buf) {
                    Ok(0) => {
                        info!("device reached end of stream");
                        self.status.set_disconnected();
                        self.forward(Err(SourceError::EndOfStream));
                        break 'device;
                    }
                    Ok(n) => {
                        if !self.forward(Ok(buf[..n].to_vec())) {
                            break 'device;
                        }
                    }
                    Err(e) => {
                        self.status.set_disconnected();
                        if self.reconnect {
                            let retry_wait = self.opener.config().retry_wait;
                            warn!(error = %e, ?retry_wait, "lost MIDI device, reopening");
                            if !self.stop.sleep(retry_wait, self.poll_interval) {
                                break 'device;
                            }
                            continue 'device;
                        }
                        self.forward(Err(e.into()));
                        break 'device;
                    }
                }
            }
        }

        self.status.set_disconnected();
        debug!("reader thread exiting");
    }

    /// Blocks while the channel is full. Returns `false` once the consumer is
    /// gone or the stream was stopped.
    fn forward(&self, mut chunk: Chunk) -> bool {
        loop {
            match self.sender.send_timeout(chunk, self.poll_interval) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(back)) => {
                    if self.stop.is_cancelled() {
                        return false;
                    }
                    chunk = back;
                }
                Err(SendTimeoutError::Disconnected(_)) => return false,
            }
        }
    }
}

fn read_chunk(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    loop {
        match file.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

fn open_failure(e: Error) -> SourceError {
    match e {
        Error::Cancelled => SourceError::Cancelled,
        Error::Io(source) => SourceError::Io(source),
        Error::DeviceOpen { ref source, .. } => {
            SourceError::Io(std::io::Error::new(source.kind(), e.to_string()))
        }
        Error::InvalidConfig(msg) => {
            SourceError::Io(std::io::Error::new(ErrorKind::InvalidInput, msg))
        }
    }
}
