//! Running key and controller state built from decoded events.

use crate::command::CommandKind;
use crate::event::DecodedEvent;

/// Current velocity of every key and current value of every controller.
///
/// Channel-agnostic: all channels write into the same tables. Key velocity 0
/// means the key is up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MidiState {
    key_velocities: [u8; 128],
    controller_values: [u8; 128],
}

impl Default for MidiState {
    fn default() -> Self {
        Self {
            key_velocities: [0; 128],
            controller_values: [0; 128],
        }
    }
}

impl MidiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state. Returns `true` if it changed anything.
    pub fn apply(&mut self, event: &DecodedEvent) -> bool {
        let (table, index, value) = match event.command() {
            CommandKind::NoteOn => match (event.key(), event.velocity()) {
                (Some(key), Some(velocity)) => (&mut self.key_velocities, key, velocity),
                _ => return false,
            },
            CommandKind::NoteOff => match event.key() {
                Some(key) => (&mut self.key_velocities, key, 0),
                None => return false,
            },
            CommandKind::Controller => match (event.get("controller"), event.get("value")) {
                (Some(cc), Some(value)) => (&mut self.controller_values, cc, value),
                _ => return false,
            },
            _ => return false,
        };

        match table.get_mut(usize::from(index)) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a DecodedEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    #[inline]
    pub fn key_velocity(&self, key: u8) -> u8 {
        self.key_velocities
            .get(usize::from(key))
            .copied()
            .unwrap_or(0)
    }

    #[inline]
    pub fn controller_value(&self, controller: u8) -> u8 {
        self.controller_values
            .get(usize::from(controller))
            .copied()
            .unwrap_or(0)
    }

    /// Keys currently down, ascending.
    pub fn held_keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.key_velocities
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0)
            .map(|(key, _)| key as u8)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::decode;
    use crate::source::SliceSource;

    fn state_from(bytes: &[u8]) -> MidiState {
        let events: Vec<DecodedEvent> = decode(SliceSource::new(bytes))
            .filter_map(Result::ok)
            .collect();
        let mut state = MidiState::new();
        state.apply_all(&events);
        state
    }

    #[test]
    fn test_key_volumes_follow_last_event() {
        let state = state_from(&[
            7, 7, 7, 0x90, 60, 17, 0x90, 61, 13, 0x90, 61, 12, 7, 7, 7, 0xF8,
        ]);
        assert_eq!(state.key_velocity(0), 0);
        assert_eq!(state.key_velocity(60), 17);
        // the trailing 7s make the last note-on malformed, so 13 sticks
        assert_eq!(state.key_velocity(61), 13);
    }

    #[test]
    fn test_note_off_releases() {
        let state = state_from(&[0x90, 60, 100, 0x90, 64, 90, 0x80, 60, 30, 0xF8]);
        assert_eq!(state.key_velocity(60), 0);
        assert_eq!(state.held_keys().collect::<Vec<_>>(), vec![64]);
    }

    #[test]
    fn test_controllers() {
        let state = state_from(&[0xB0, 64, 127, 0xB3, 7, 100, 0xB0, 64, 0, 0xF8]);
        assert_eq!(state.controller_value(64), 0);
        assert_eq!(state.controller_value(7), 100);
    }

    #[test]
    fn test_apply_reports_change() {
        let mut state = MidiState::new();
        let on = crate::interpret(&crate::RawMessage::from(&[0x90, 60, 5][..])).unwrap();
        assert!(state.apply(&on));
        assert!(!state.apply(&on));

        let bend = crate::interpret(&crate::RawMessage::from(&[0xE0, 0, 64][..])).unwrap();
        assert!(!state.apply(&bend));

        state.reset();
        assert_eq!(state.key_velocity(60), 0);
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut state = MidiState::new();
        let bogus = crate::interpret(&crate::RawMessage::from(&[0x90, 200, 5][..])).unwrap();
        assert!(!state.apply(&bogus));
        assert_eq!(state.key_velocity(200), 0);
    }
}
