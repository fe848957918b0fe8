//! The command table: status nibble -> (name, field list).
//!
//! See <http://www.midi.org/techspecs/midimessages.php>. Every field value on
//! the right-hand side is 7 bits (0-127).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message type selected by the high nibble of a status byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    NoteOff,
    NoteOn,
    Aftertouch,
    /// Controllers 120-127 are channel mode messages; decoded like any other.
    Controller,
    ProgramChange,
    ChannelPressure,
    /// `lsb` and `msb` are combined into a 14-bit `value`.
    PitchBend,
    /// Payload varies by sub-message and is not decoded.
    System,
}

/// Static description of one command kind.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub kind: CommandKind,
    pub nibble: u8,
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

/// Indexed by `nibble - 0x8`.
pub static COMMAND_TABLE: [CommandDescriptor; 8] = [
    CommandDescriptor {
        kind: CommandKind::NoteOff,
        nibble: 0x8,
        name: "note-off",
        fields: &["key", "velocity"],
    },
    CommandDescriptor {
        kind: CommandKind::NoteOn,
        nibble: 0x9,
        name: "note-on",
        fields: &["key", "velocity"],
    },
    CommandDescriptor {
        kind: CommandKind::Aftertouch,
        nibble: 0xA,
        name: "aftertouch",
        fields: &["key", "touch"],
    },
    CommandDescriptor {
        kind: CommandKind::Controller,
        nibble: 0xB,
        name: "controller",
        fields: &["controller", "value"],
    },
    CommandDescriptor {
        kind: CommandKind::ProgramChange,
        nibble: 0xC,
        name: "program-change",
        fields: &["instrument"],
    },
    CommandDescriptor {
        kind: CommandKind::ChannelPressure,
        nibble: 0xD,
        name: "channel-pressure",
        fields: &["pressure"],
    },
    CommandDescriptor {
        kind: CommandKind::PitchBend,
        nibble: 0xE,
        name: "pitch-bend",
        fields: &["lsb", "msb"],
    },
    CommandDescriptor {
        kind: CommandKind::System,
        nibble: 0xF,
        name: "system",
        fields: &[],
    },
];

/// Look up a command kind by status nibble. `None` outside 0x8-0xf.
#[inline]
pub fn lookup(nibble: u8) -> Option<&'static CommandDescriptor> {
    match nibble {
        0x8..=0xF => COMMAND_TABLE.get(usize::from(nibble - 0x8)),
        _ => None,
    }
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::NoteOff,
        CommandKind::NoteOn,
        CommandKind::Aftertouch,
        CommandKind::Controller,
        CommandKind::ProgramChange,
        CommandKind::ChannelPressure,
        CommandKind::PitchBend,
        CommandKind::System,
    ];

    #[inline]
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        lookup(nibble).map(|d| d.kind)
    }

    #[inline]
    pub fn descriptor(self) -> &'static CommandDescriptor {
        &COMMAND_TABLE[self as usize]
    }

    #[inline]
    pub fn nibble(self) -> u8 {
        self.descriptor().nibble
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    #[inline]
    pub fn fields(self) -> &'static [&'static str] {
        self.descriptor().fields
    }

    /// Number of data bytes a well-formed message of this kind carries.
    #[inline]
    pub fn arity(self) -> usize {
        self.fields().len()
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
