//! # midiscope
//!
//! Decodes the serial byte stream of a MIDI keyboard controller and prints
//! what it sees.
//!
//! ## Architecture
//!
//! midiscope is an umbrella crate over:
//! - **midiscope-wire** - framing, command table, interpretation, key/controller state
//! - **midiscope-io** - device files, retrying opener, background reader thread
//!
//! and adds the pieces that tie them together: the [`Monitor`] pipeline,
//! the [`StatusFilter`], and output sinks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use midiscope::prelude::*;
//!
//! let cancel = CancelToken::new();
//! let stream = DeviceStream::spawn(DeviceConfig::new("/dev/midi1"), cancel.clone())?;
//!
//! let mut monitor = Monitor::builder()
//!     .source(stream)
//!     .cancel_token(cancel)
//!     .build()?;
//!
//! let mut sink = TextSink::new(std::io::stdout().lock());
//! let report = monitor.run(&mut sink)?;
//! println!("{} messages", report.messages);
//! # Ok::<(), midiscope::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `json` (default) - [`JsonSink`] and `--json` output

/// Re-export of midiscope-wire for direct access
pub use midiscope_wire as wire;

/// Re-export of midiscope-io for direct access
pub use midiscope_io as io;

mod error;
pub use error::{Error, Result};

mod filter;
pub use filter::StatusFilter;

mod sink;
pub use sink::{EventSink, OutputFormat, TextSink};

#[cfg(feature = "json")]
pub use sink::JsonSink;

mod monitor;
pub use monitor::{Monitor, MonitorBuilder, MonitorReport, Termination};

pub mod prelude {
    pub use crate::{
        Error, EventSink, Monitor, MonitorBuilder, MonitorReport, OutputFormat, Result,
        StatusFilter, Termination, TextSink,
    };

    #[cfg(feature = "json")]
    pub use crate::JsonSink;

    pub use midiscope_io::{CancelToken, DeviceConfig, DeviceStream, ReaderSource};
    pub use midiscope_wire::{
        decode, interpret, ByteSource, CommandKind, DecodeError, DecodedEvent, MidiState,
        RawMessage, SliceSource,
    };
}
