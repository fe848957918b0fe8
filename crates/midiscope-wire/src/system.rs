//! System message classification.
//!
//! For status nibble 0xf the low nibble is not a channel but a sub-message
//! selector. Only the selector is classified here; payloads (time code,
//! song position, sysex) stay undecoded.
//!
//! See <https://en.wikipedia.org/wiki/MIDI_timecode#Quarter-frame_messages>.

use crate::byte::{channel_of, kind_of};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemMessage {
    SysExStart,
    /// `0nnndddd`: n = message type, d = value nibble.
    TimeCodeQuarterFrame,
    /// Two data bytes, lsb first, in beats.
    SongPosition,
    SongSelect,
    TuneRequest,
    SysExEnd,
    /// 24 per quarter note.
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    Reset,
    Undefined(u8),
}

impl SystemMessage {
    /// Classify by the low nibble of a 0xf_ status byte.
    pub fn from_selector(selector: u8) -> Self {
        match selector & 0x0F {
            0x0 => Self::SysExStart,
            0x1 => Self::TimeCodeQuarterFrame,
            0x2 => Self::SongPosition,
            0x3 => Self::SongSelect,
            0x6 => Self::TuneRequest,
            0x7 => Self::SysExEnd,
            0x8 => Self::TimingClock,
            0xA => Self::Start,
            0xB => Self::Continue,
            0xC => Self::Stop,
            0xE => Self::ActiveSensing,
            0xF => Self::Reset,
            other => Self::Undefined(other),
        }
    }

    /// `None` unless `status` is a system status byte.
    pub fn from_status(status: u8) -> Option<Self> {
        (kind_of(status) == 0xF).then(|| Self::from_selector(channel_of(status)))
    }

    /// Real-time messages may arrive between the bytes of other messages.
    #[inline]
    pub fn is_realtime(self) -> bool {
        matches!(
            self,
            Self::TimingClock
                | Self::Start
                | Self::Continue
                | Self::Stop
                | Self::ActiveSensing
                | Self::Reset
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SysExStart => "sysex-start",
            Self::TimeCodeQuarterFrame => "time-code-quarter-frame",
            Self::SongPosition => "song-position",
            Self::SongSelect => "song-select",
            Self::TuneRequest => "tune-request",
            Self::SysExEnd => "sysex-end",
            Self::TimingClock => "timing-clock",
            Self::Start => "start",
            Self::Continue => "continue",
            Self::Stop => "stop",
            Self::ActiveSensing => "active-sensing",
            Self::Reset => "reset",
            Self::Undefined(_) => "undefined",
        }
    }
}

impl fmt::Display for SystemMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined(selector) => write!(f, "undefined({:#x})", selector),
            other => f.write_str(other.name()),
        }
    }
}
