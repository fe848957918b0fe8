//! The monitor pipeline: byte source → framer → interpreter → filter → sink.

use crate::error::{Error, Result};
use crate::filter::StatusFilter;
use crate::sink::EventSink;
use midiscope_io::CancelToken;
use midiscope_wire::{decode, ByteSource, Decoder, Error as WireError, MidiState};
use serde::Serialize;
use tracing::{debug, info};

/// Why a [`Monitor::run`] call returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// `max_events` events were shown.
    Limit,
    /// The cancel token fired, or the source reported cancellation.
    Cancelled,
    /// The source ran dry.
    #[default]
    EndOfStream,
}

/// Counters for one run.
///
/// Every framed message is counted once in `messages`, and then either in
/// `events` or in `decode_errors`. Every event is either `shown` or `filtered`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorReport {
    pub messages: u64,
    pub events: u64,
    pub shown: u64,
    pub filtered: u64,
    pub decode_errors: u64,
    pub termination: Termination,
}

/// Pulls events from a source and pushes them to a sink.
///
/// # Example
///
/// ```
/// use midiscope::{Monitor, TextSink, Termination};
/// use midiscope::wire::SliceSource;
///
/// let mut monitor = Monitor::builder()
///     .source(SliceSource::new(&[0x90, 60, 65, 0xF8, 0x80, 60, 0]))
///     .track_state(true)
///     .build()?;
///
/// let mut sink = TextSink::new(Vec::new());
/// let report = monitor.run(&mut sink)?;
///
/// assert_eq!(report.shown, 2);
/// assert_eq!(report.filtered, 1);
/// assert_eq!(report.termination, Termination::EndOfStream);
/// assert!(monitor.state().unwrap().held_keys().next().is_none());
/// # Ok::<(), midiscope::Error>(())
/// ```
pub struct Monitor<S> {
    decoder: Decoder<S>,
    filter: StatusFilter,
    max_events: Option<u64>,
    cancel: Option<CancelToken>,
    state: Option<MidiState>,
}

impl<S: ByteSource> Monitor<S> {
    pub fn builder() -> MonitorBuilder<S> {
        MonitorBuilder::new()
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    /// Tracked key and controller state, if enabled.
    pub fn state(&self) -> Option<&MidiState> {
        self.state.as_ref()
    }

    pub fn into_source(self) -> S {
        self.decoder.into_source()
    }

    /// Run until the event limit, cancellation, or the end of the source.
    ///
    /// Decode errors go to the sink and never stop the run. Only I/O
    /// failures, from the source or the sink, are returned as errors.
    pub fn run(&mut self, sink: &mut dyn EventSink) -> Result<MonitorReport> {
        let mut report = MonitorReport::default();

        let termination = loop {
            if self.max_events.is_some_and(|max| report.shown >= max) {
                break Termination::Limit;
            }
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                break Termination::Cancelled;
            }
            let Some(item) = self.decoder.next() else {
                break Termination::EndOfStream;
            };

            match item {
                Ok(event) => {
                    report.messages += 1;
                    report.events += 1;
                    if let Some(state) = self.state.as_mut() {
                        state.apply(&event);
                    }
                    if self.filter.shows(&event) {
                        sink.event(&event)?;
                        report.shown += 1;
                    } else {
                        report.filtered += 1;
                    }
                }
                Err(WireError::Decode { raw, error }) => {
                    report.messages += 1;
                    report.decode_errors += 1;
                    sink.decode_error(&raw, &error)?;
                }
                Err(WireError::Stream(e)) if e.is_end_of_stream() => {
                    break Termination::EndOfStream;
                }
                Err(WireError::Stream(e)) if e.is_cancelled() => {
                    break Termination::Cancelled;
                }
                Err(WireError::Stream(e)) => {
                    sink.flush()?;
                    return Err(e.into());
                }
            }
        };

        sink.flush()?;
        report.termination = termination;
        info!(
            messages = report.messages,
            shown = report.shown,
            filtered = report.filtered,
            decode_errors = report.decode_errors,
            ?termination,
            "monitor stopped"
        );
        Ok(report)
    }
}

/// Builder for [`Monitor`]. Only the source is required.
pub struct MonitorBuilder<S> {
    source: Option<S>,
    filter: StatusFilter,
    max_events: Option<u64>,
    cancel: Option<CancelToken>,
    track_state: bool,
}

impl<S> Default for MonitorBuilder<S> {
    fn default() -> Self {
        Self {
            source: None,
            filter: StatusFilter::default(),
            max_events: None,
            cancel: None,
            track_state: false,
        }
    }
}

impl<S: ByteSource> MonitorBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    /// Default: hide timing clock and active sensing
    pub fn filter(mut self, filter: StatusFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Stop after this many shown events. Default: unlimited
    pub fn max_events(mut self, max: u64) -> Self {
        self.max_events = Some(max);
        self
    }

    /// Checked before every pull. The source may hold its own token as well.
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Default: false
    pub fn track_state(mut self, enabled: bool) -> Self {
        self.track_state = enabled;
        self
    }

    pub fn build(self) -> Result<Monitor<S>> {
        let source = self.source.ok_or(Error::NoSource)?;
        debug!(
            skipped = ?self.filter.skipped().collect::<Vec<_>>(),
            max_events = ?self.max_events,
            track_state = self.track_state,
            "building monitor"
        );
        Ok(Monitor {
            decoder: decode(source),
            filter: self.filter,
            max_events: self.max_events,
            cancel: self.cancel,
            state: self.track_state.then(MidiState::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::TextSink;
    use midiscope_wire::{DecodeError, DecodedEvent, RawMessage, SliceSource, SourceError};

    #[derive(Default)]
    struct Collect {
        events: Vec<DecodedEvent>,
        errors: Vec<(RawMessage, DecodeError)>,
        flushes: usize,
    }

    impl EventSink for Collect {
        fn event(&mut self, event: &DecodedEvent) -> std::io::Result<()> {
            self.events.push(event.clone());
            Ok(())
        }

        fn decode_error(&mut self, raw: &RawMessage, error: &DecodeError) -> std::io::Result<()> {
            self.errors.push((raw.clone(), *error));
            Ok(())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn monitor(bytes: &[u8]) -> MonitorBuilder<SliceSource> {
        Monitor::builder().source(SliceSource::new(bytes))
    }

    #[test]
    fn test_counts_add_up() {
        let bytes = [0x3C, 0x90, 60, 65, 0xF8, 0x90, 60, 0xFE, 0x80, 60, 0];
        let mut sink = Collect::default();
        let report = monitor(&bytes).build().unwrap().run(&mut sink).unwrap();

        assert_eq!(
            report,
            MonitorReport {
                messages: 6,
                events: 4,
                shown: 2,
                filtered: 2,
                decode_errors: 2,
                termination: Termination::EndOfStream,
            }
        );
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.errors[0].1, DecodeError::UnknownCommand(0x3));
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn test_show_all_filter() {
        let mut sink = Collect::default();
        let report = monitor(&[0xF8, 0xFE, 0xFA])
            .filter(StatusFilter::show_all())
            .build()
            .unwrap()
            .run(&mut sink)
            .unwrap();
        assert_eq!(report.shown, 3);
        assert_eq!(report.filtered, 0);
    }

    #[test]
    fn test_max_events_counts_shown_only() {
        let bytes = [0xF8, 0x90, 60, 65, 0xF8, 0x90, 62, 65, 0x90, 64, 65];
        let mut sink = Collect::default();
        let mut m = monitor(&bytes).max_events(2).build().unwrap();

        let report = m.run(&mut sink).unwrap();
        assert_eq!(report.termination, Termination::Limit);
        assert_eq!(report.shown, 2);
        assert_eq!(report.filtered, 2);

        // A second run resumes where the first stopped.
        let report = m.run(&mut sink).unwrap();
        assert_eq!(report.shown, 1);
        assert_eq!(sink.events[2].key(), Some(64));
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut sink = Collect::default();
        let report = monitor(&[0x90, 60, 65])
            .cancel_token(cancel)
            .build()
            .unwrap()
            .run(&mut sink)
            .unwrap();

        assert_eq!(report.termination, Termination::Cancelled);
        assert_eq!(report.messages, 0);
    }

    struct CancelledSource;

    impl ByteSource for CancelledSource {
        fn read_byte(&mut self) -> std::result::Result<u8, SourceError> {
            Err(SourceError::Cancelled)
        }
    }

    #[test]
    fn test_source_cancellation_is_clean() {
        let mut m = Monitor::builder().source(CancelledSource).build().unwrap();
        let report = m.run(&mut Collect::default()).unwrap();
        assert_eq!(report.termination, Termination::Cancelled);
    }

    struct BrokenSource(Vec<u8>);

    impl ByteSource for BrokenSource {
        fn read_byte(&mut self) -> std::result::Result<u8, SourceError> {
            if self.0.is_empty() {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged").into())
            } else {
                Ok(self.0.remove(0))
            }
        }
    }

    #[test]
    fn test_io_failure_is_an_error() {
        let mut m = Monitor::builder()
            .source(BrokenSource(vec![0x90, 60, 65, 0x80, 60]))
            .build()
            .unwrap();
        let mut sink = Collect::default();

        let err = m.run(&mut sink).unwrap_err();
        assert!(matches!(err, Error::Wire(WireError::Stream(_))));
        // The partial note-off is dropped with the failure.
        assert_eq!(sink.events.len(), 1);
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn test_missing_source() {
        let builder: MonitorBuilder<SliceSource> = MonitorBuilder::new();
        assert!(matches!(builder.build(), Err(Error::NoSource)));
    }

    #[test]
    fn test_state_tracking() {
        let bytes = [0x90, 60, 65, 0x90, 64, 70, 0xB0, 7, 100, 0x80, 60, 0];
        let mut m = monitor(&bytes).track_state(true).build().unwrap();
        m.run(&mut TextSink::new(std::io::sink())).unwrap();

        let state = m.state().unwrap();
        assert_eq!(state.key_velocity(60), 0);
        assert_eq!(state.key_velocity(64), 70);
        assert_eq!(state.controller_value(7), 100);
    }

    #[test]
    fn test_report_serializes() {
        let report = MonitorReport {
            shown: 3,
            termination: Termination::Limit,
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["termination"], "limit");
        assert_eq!(json["shown"], 3);
    }
}
