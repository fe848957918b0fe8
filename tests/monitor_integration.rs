//! Monitor pipeline tests: captured byte dumps and device files through to
//! sink output.
//!
//! Run with:
//! ```bash
//! cargo test -p midiscope --test monitor_integration
//! ```

use midiscope::prelude::*;
use std::io::Write;
use std::time::Duration;

/// A short session as a keyboard sends it: clock ticks and active sensing
/// interleaved with a note, a sustain pedal press, and a pitch-bend sweep.
const SESSION: &[u8] = &[
    0xFE, // active sensing
    0x90, 60, 100, // note-on C4
    0xF8, // clock
    0xB0, 64, 127, // sustain down
    0xE0, 0, 64, // bend centre
    0xF8, // clock
    0xE0, 127, 127, // bend max
    0x80, 60, 0, // note-off C4
    0xFE, // active sensing
];

fn capture_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

// ----------------------------------------------------------------------------
// Text output
// ----------------------------------------------------------------------------

#[test]
fn test_text_output_for_session() {
    let mut monitor = Monitor::builder()
        .source(SliceSource::new(SESSION))
        .build()
        .unwrap();
    let mut out = Vec::new();
    let report = monitor.run(&mut TextSink::new(&mut out)).unwrap();

    let text = String::from_utf8(out).unwrap();
    let blocks: Vec<&str> = text.split("\n\n").filter(|b| !b.is_empty()).collect();

    assert_eq!(blocks.len(), 5);
    assert_eq!(
        blocks[0],
        "90 3c 64\n{channel: 0, command: note-on, key: 60, raw: [144, 60, 100], velocity: 100}"
    );
    assert_eq!(
        blocks[1],
        "b0 40 7f\n{channel: 0, command: controller, controller: 64, raw: [176, 64, 127], value: 127}"
    );
    assert!(blocks[2].ends_with("value: 8192}"));
    assert!(blocks[3].ends_with("value: 16383}"));
    assert!(blocks[4].starts_with("80 3c 00\n"));

    assert_eq!(report.messages, 9);
    assert_eq!(report.filtered, 4);
    assert_eq!(report.decode_errors, 0);
}

#[test]
fn test_show_clock_prints_everything() {
    let mut monitor = Monitor::builder()
        .source(SliceSource::new(SESSION))
        .filter(StatusFilter::show_all())
        .build()
        .unwrap();
    let mut out = Vec::new();
    let report = monitor.run(&mut TextSink::new(&mut out)).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(report.shown, 9);
    assert!(text.starts_with("fe\n{channel: 14, command: system, raw: [254]}\n\n"));
}

#[test]
fn test_decode_errors_printed_and_never_filtered() {
    let bytes = [0x45, 0xF8, 0x90, 60, 0xFE];
    let mut monitor = Monitor::builder()
        .source(SliceSource::new(&bytes))
        .build()
        .unwrap();
    let mut out = Vec::new();
    let report = monitor.run(&mut TextSink::new(&mut out)).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(report.decode_errors, 2);
    assert_eq!(report.shown, 0);
    assert!(text.contains("error: unknown command kind 0x4\n    msg: 45\n"));
    assert!(text.contains("    msg: 90 3c\n    expected fields: note-on (key, velocity)\n"));
}

// ----------------------------------------------------------------------------
// JSON output
// ----------------------------------------------------------------------------

#[test]
fn test_json_lines_for_session() {
    let mut monitor = Monitor::builder()
        .source(SliceSource::new(SESSION))
        .build()
        .unwrap();
    let mut out = Vec::new();
    monitor.run(&mut JsonSink::new(&mut out)).unwrap();

    let records: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 5);
    assert_eq!(
        records[0],
        serde_json::json!({
            "command": "note-on",
            "channel": 0,
            "raw": [144, 60, 100],
            "key": 60,
            "velocity": 100
        })
    );
    assert_eq!(records[2]["lsb"], 0);
    assert_eq!(records[2]["msb"], 64);
    assert_eq!(records[2]["value"], 8192);
    assert_eq!(records[4]["command"], "note-off");
}

// ----------------------------------------------------------------------------
// Sources
// ----------------------------------------------------------------------------

#[test]
fn test_replay_capture_file_with_state() {
    let capture = capture_file(SESSION);
    let file = std::fs::File::open(capture.path()).unwrap();

    let mut monitor = Monitor::builder()
        .source(ReaderSource::with_chunk_size(file, 5))
        .track_state(true)
        .build()
        .unwrap();
    let report = monitor.run(&mut TextSink::new(std::io::sink())).unwrap();

    assert_eq!(report.termination, Termination::EndOfStream);
    assert_eq!(report.events, 9);

    let state = monitor.state().unwrap();
    assert_eq!(state.key_velocity(60), 0);
    assert_eq!(state.controller_value(64), 127);
}

#[test]
fn test_device_stream_with_count_limit() {
    let capture = capture_file(SESSION);
    let config = DeviceConfig {
        retry_wait: Duration::from_millis(10),
        poll_interval: Duration::from_millis(5),
        ..DeviceConfig::new(capture.path())
    };
    let cancel = CancelToken::new();
    let stream = DeviceStream::spawn(config, cancel.clone()).unwrap();

    let mut monitor = Monitor::builder()
        .source(stream)
        .cancel_token(cancel)
        .max_events(2)
        .build()
        .unwrap();
    let mut out = Vec::new();
    let report = monitor.run(&mut JsonSink::new(&mut out)).unwrap();

    assert_eq!(report.termination, Termination::Limit);
    assert_eq!(report.shown, 2);
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
}

#[test]
fn test_cancel_stops_waiting_monitor() {
    let dir = tempfile::tempdir().unwrap();
    let config = DeviceConfig {
        retry_wait: Duration::from_millis(10),
        poll_interval: Duration::from_millis(5),
        ..DeviceConfig::new(dir.path().join("midi1"))
    };
    let cancel = CancelToken::new();
    let stream = DeviceStream::spawn(config, cancel.clone()).unwrap();

    let canceller = {
        let cancel = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            cancel.cancel();
        })
    };

    let mut monitor = Monitor::builder()
        .source(stream)
        .cancel_token(cancel)
        .build()
        .unwrap();
    let report = monitor.run(&mut TextSink::new(std::io::sink())).unwrap();
    canceller.join().unwrap();

    assert_eq!(report.termination, Termination::Cancelled);
    assert_eq!(report.messages, 0);
}
