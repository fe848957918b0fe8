//! Message interpretation.

use crate::byte::{channel_of, kind_of};
use crate::command::{self, CommandKind};
use crate::error::{DecodeError, Error};
use crate::event::DecodedEvent;
use crate::framer::{frame, Frames};
use crate::message::RawMessage;
use crate::source::ByteSource;
use std::iter::FusedIterator;
use tracing::debug;

/// Map one framed message to an event.
///
/// Stateless. Requires exactly one data byte per declared field and never
/// builds a partial event. A message whose first byte is a stray data byte
/// maps to a nibble below 0x8 and is rejected as an unknown command.
pub fn interpret(raw: &RawMessage) -> Result<DecodedEvent, DecodeError> {
    let status = raw.first().ok_or(DecodeError::Empty)?;
    let channel = channel_of(status);
    let nibble = kind_of(status);
    let descriptor = command::lookup(nibble).ok_or(DecodeError::UnknownCommand(nibble))?;

    let data = raw.data();
    if data.len() != descriptor.fields.len() {
        return Err(DecodeError::ArityMismatch {
            expected: descriptor.fields.len(),
            actual: data.len(),
        });
    }

    let fields = descriptor
        .fields
        .iter()
        .copied()
        .zip(data.iter().copied())
        .collect();

    let value = match descriptor.kind {
        CommandKind::PitchBend => Some(pitch_bend_value(data[0], data[1])),
        _ => None,
    };

    Ok(DecodedEvent::new(
        descriptor.kind,
        channel,
        raw.clone(),
        fields,
        value,
    ))
}

/// Combine pitch-bend data bytes, least significant first, into 14 bits.
#[inline]
pub fn pitch_bend_value(lsb: u8, msb: u8) -> u16 {
    u16::from(lsb & 0x7F) | (u16::from(msb & 0x7F) << 7)
}

/// Frame and interpret a byte source in one pass.
pub fn decode<S: ByteSource>(source: S) -> Decoder<S> {
    Decoder {
        frames: frame(source),
    }
}

/// Pull iterator of decoded events.
///
/// `Err(Error::Decode { .. })` items are recoverable: keep iterating.
/// `Err(Error::Stream(_))` is the last item.
#[derive(Debug)]
pub struct Decoder<S> {
    frames: Frames<S>,
}

impl<S: ByteSource> Decoder<S> {
    pub fn source_mut(&mut self) -> &mut S {
        self.frames.source_mut()
    }

    pub fn into_source(self) -> S {
        self.frames.into_source()
    }
}

impl<S: ByteSource> Iterator for Decoder<S> {
    type Item = Result<DecodedEvent, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = match self.frames.next()? {
            Ok(raw) => raw,
            Err(e) => return Some(Err(e.into())),
        };
        Some(interpret(&raw).map_err(|error| {
            debug!(raw = %raw, %error, "skipping undecodable message");
            Error::Decode { raw, error }
        }))
    }
}

impl<S: ByteSource> FusedIterator for Decoder<S> {}
