//! Output sinks for decoded events.

use midiscope_wire::{CommandKind, DecodeError, DecodedEvent, RawMessage};
use std::io::{self, Write};

/// Receives every event that passes the filter and every decode error.
pub trait EventSink {
    fn event(&mut self, event: &DecodedEvent) -> io::Result<()>;

    fn decode_error(&mut self, raw: &RawMessage, error: &DecodeError) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn event(&mut self, event: &DecodedEvent) -> io::Result<()> {
        (**self).event(event)
    }

    fn decode_error(&mut self, raw: &RawMessage, error: &DecodeError) -> io::Result<()> {
        (**self).decode_error(raw, error)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn event(&mut self, event: &DecodedEvent) -> io::Result<()> {
        (**self).event(event)
    }

    fn decode_error(&mut self, raw: &RawMessage, error: &DecodeError) -> io::Result<()> {
        (**self).decode_error(raw, error)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Human-readable output.
///
/// ```text
/// 90 3c 41
/// {channel: 0, command: note-on, key: 60, raw: [144, 60, 65], velocity: 65}
///
/// ```
///
/// Decode errors become an `error:` block naming the bytes and, when the
/// status byte is known, the fields that were expected.
#[derive(Debug)]
pub struct TextSink<W> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for TextSink<W> {
    fn event(&mut self, event: &DecodedEvent) -> io::Result<()> {
        writeln!(self.writer, "{}", event.raw())?;
        writeln!(self.writer, "{event}")?;
        writeln!(self.writer)
    }

    fn decode_error(&mut self, raw: &RawMessage, error: &DecodeError) -> io::Result<()> {
        writeln!(self.writer, "error: {error}")?;
        writeln!(self.writer, "    msg: {raw}")?;
        if let Some(kind) = raw.kind().and_then(CommandKind::from_nibble) {
            let fields = match kind.fields() {
                [] => "none".to_string(),
                fields => fields.join(", "),
            };
            writeln!(self.writer, "    expected fields: {kind} ({fields})")?;
        }
        writeln!(self.writer)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// One JSON object per line.
///
/// Events serialize as flat maps (`{"command":"note-on","channel":0,...}`);
/// decode errors as `{"error":"...","raw":[...]}`.
#[cfg(feature = "json")]
#[derive(Debug)]
pub struct JsonSink<W> {
    writer: W,
}

#[cfg(feature = "json")]
impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(feature = "json")]
impl<W: Write> EventSink for JsonSink<W> {
    fn event(&mut self, event: &DecodedEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        writeln!(self.writer)
    }

    fn decode_error(&mut self, raw: &RawMessage, error: &DecodeError) -> io::Result<()> {
        let record = serde_json::json!({
            "error": error.to_string(),
            "raw": raw,
        });
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(self.writer)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Output format selector for front ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    #[cfg(feature = "json")]
    Json,
}

impl OutputFormat {
    pub fn sink<'a, W: Write + 'a>(self, writer: W) -> Box<dyn EventSink + 'a> {
        match self {
            OutputFormat::Text => Box::new(TextSink::new(writer)),
            #[cfg(feature = "json")]
            OutputFormat::Json => Box::new(JsonSink::new(writer)),
        }
    }
}
