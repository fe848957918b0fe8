//! Decoded event records.

use crate::command::CommandKind;
use crate::message::RawMessage;
use crate::system::SystemMessage;
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Pitch-bend wheel at rest.
pub const PITCH_BEND_CENTER: u16 = 8192;

/// One interpreted message.
///
/// Carries the command, the channel, the original bytes, one `(name, value)`
/// pair per declared field, and for pitch-bend the combined 14-bit `value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedEvent {
    command: CommandKind,
    channel: u8,
    raw: RawMessage,
    fields: SmallVec<[(&'static str, u8); 2]>,
    value: Option<u16>,
}

impl DecodedEvent {
    pub(crate) fn new(
        command: CommandKind,
        channel: u8,
        raw: RawMessage,
        fields: SmallVec<[(&'static str, u8); 2]>,
        value: Option<u16>,
    ) -> Self {
        Self {
            command,
            channel,
            raw,
            fields,
            value,
        }
    }

    #[inline]
    pub fn command(&self) -> CommandKind {
        self.command
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.command.name()
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    #[inline]
    pub fn raw(&self) -> &RawMessage {
        &self.raw
    }

    #[inline]
    pub fn status(&self) -> u8 {
        self.raw.first().unwrap_or_default()
    }

    /// Declared fields in table order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        self.fields.iter().copied()
    }

    /// Value of a named field, e.g. `get("velocity")`.
    pub fn get(&self, field: &str) -> Option<u8> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|&(_, v)| v)
    }

    /// Combined 14-bit pitch-bend value (0..=16383). `None` for other commands.
    ///
    /// Serialized under the `value` key. A controller's own `value` field is a
    /// separate 7-bit data byte; read it with `get("value")`.
    #[inline]
    pub fn bend_value(&self) -> Option<u16> {
        self.value
    }

    /// Pitch-bend relative to center (-8192..=8191).
    #[inline]
    pub fn bend(&self) -> Option<i16> {
        self.value.map(|v| v as i16 - PITCH_BEND_CENTER as i16)
    }

    #[inline]
    pub fn key(&self) -> Option<u8> {
        self.get("key")
    }

    #[inline]
    pub fn velocity(&self) -> Option<u8> {
        self.get("velocity")
    }

    /// Note-on with velocity 0 counts as a release, not a press.
    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.command == CommandKind::NoteOn && self.velocity().is_some_and(|v| v > 0)
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        match self.command {
            CommandKind::NoteOff => true,
            CommandKind::NoteOn => self.velocity() == Some(0),
            _ => false,
        }
    }

    /// Sub-message of a `system` event.
    #[inline]
    pub fn system_message(&self) -> Option<SystemMessage> {
        match self.command {
            CommandKind::System => Some(SystemMessage::from_selector(self.channel)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_realtime(&self) -> bool {
        self.system_message().is_some_and(SystemMessage::is_realtime)
    }
}

/// Flat map: `{command, channel, raw, <fields...>, [value]}`.
impl Serialize for DecodedEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = 3 + self.fields.len() + usize::from(self.value.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("command", self.command.name())?;
        map.serialize_entry("channel", &self.channel)?;
        map.serialize_entry("raw", &self.raw)?;
        for (name, v) in &self.fields {
            map.serialize_entry(name, v)?;
        }
        if let Some(value) = self.value {
            map.serialize_entry("value", &value)?;
        }
        map.end()
    }
}

/// Structured text with keys sorted:
/// `{channel: 0, command: note-on, key: 60, raw: [144, 60, 65], velocity: 65}`.
impl fmt::Display for DecodedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: SmallVec<[(&str, String); 6]> = SmallVec::new();
        entries.push(("command", self.command.name().to_string()));
        entries.push(("channel", self.channel.to_string()));
        entries.push(("raw", format!("{:?}", self.raw.bytes())));
        entries.extend(self.fields.iter().map(|&(k, v)| (k, v.to_string())));
        if let Some(value) = self.value {
            entries.push(("value", value.to_string()));
        }
        entries.sort_by_key(|&(k, _)| k);

        f.write_str("{")?;
        for (i, (k, v)) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        f.write_str("}")
    }
}
