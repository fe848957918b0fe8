//! MIDI wire decoding for midiscope.
//!
//! Turns a raw serial byte stream from a keyboard controller into structured
//! events, in two stages:
//!
//! - **Framing**: bytes are regrouped into messages using the high-bit rule.
//!   A status byte (>= 0x80) closes the message in progress and opens the next.
//! - **Interpretation**: each message is looked up in a fixed command table by
//!   the high nibble of its status byte, checked for arity, and mapped to a
//!   [`DecodedEvent`].
//!
//! No I/O happens here. Bytes come from any [`ByteSource`]; live device sources
//! live in `midiscope-io`.
//!
//! # Example
//!
//! ```
//! use midiscope_wire::{decode, SliceSource};
//!
//! let mut events = decode(SliceSource::new(&[0x90, 60, 65, 0x80, 60, 0]));
//!
//! let on = events.next().unwrap().unwrap();
//! assert_eq!(on.name(), "note-on");
//! assert_eq!(on.get("velocity"), Some(65));
//!
//! let off = events.next().unwrap().unwrap();
//! assert_eq!(off.name(), "note-off");
//!
//! // The source is drained: the stream error comes last.
//! assert!(events.next().unwrap().unwrap_err().is_fatal());
//! ```

pub mod error;
pub use error::{DecodeError, Error, Result, SourceError, StreamError};

pub mod byte;
pub use byte::{ACTIVE_SENSING, TIMING_CLOCK};

mod message;
pub use message::RawMessage;

pub mod command;
pub use command::{CommandDescriptor, CommandKind, COMMAND_TABLE};

mod source;
pub use source::{ByteSource, SliceSource};

mod framer;
pub use framer::{frame, Framer, Frames};

mod event;
pub use event::{DecodedEvent, PITCH_BEND_CENTER};

mod interpret;
pub use interpret::{decode, interpret, pitch_bend_value, Decoder};

mod system;
pub use system::SystemMessage;

mod state;
pub use state::MidiState;
