//! Byte sources for midiscope.
//!
//! - [`ReaderSource`]: blocking source over any `std::io::Read`
//! - [`DeviceOpener`]: opens a device file, retrying while it is absent
//! - [`DeviceStream`]: reader thread plus bounded channel, cancellable
//!
//! All of them implement [`midiscope_wire::ByteSource`], so they plug
//! straight into the framer.
//!
//! # Example
//!
//! ```no_run
//! use midiscope_io::{CancelToken, DeviceConfig, DeviceStream};
//! use midiscope_wire::decode;
//!
//! let cancel = CancelToken::new();
//! let stream = DeviceStream::spawn(DeviceConfig::new("/dev/midi1"), cancel.clone())?;
//!
//! for item in decode(stream) {
//!     match item {
//!         Ok(event) => println!("{event}"),
//!         Err(e) if e.is_fatal() => break,
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! # Ok::<(), midiscope_io::Error>(())
//! ```

mod error;
pub use error::{Error, Result};

mod cancel;
pub use cancel::CancelToken;

mod config;
pub use config::{DeviceConfig, DEFAULT_DEVICE};

mod reader;
pub use reader::ReaderSource;

mod device;
pub use device::DeviceOpener;

mod stream;
pub use stream::{DeviceStream, StreamStatus};
