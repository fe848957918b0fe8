//! Which events reach the sink.

use midiscope_wire::{DecodedEvent, ACTIVE_SENSING, TIMING_CLOCK};

/// Skip set keyed by the full status byte.
///
/// The default hides timing clock (0xF8) and active sensing (0xFE), which
/// many keyboards send several times per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    skip: [bool; 256],
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::show_all().skip(TIMING_CLOCK).skip(ACTIVE_SENSING)
    }
}

impl StatusFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty skip set.
    pub fn show_all() -> Self {
        Self { skip: [false; 256] }
    }

    pub fn skip(mut self, status: u8) -> Self {
        self.skip[usize::from(status)] = true;
        self
    }

    pub fn allow(mut self, status: u8) -> Self {
        self.skip[usize::from(status)] = false;
        self
    }

    #[inline]
    pub fn is_skipped(&self, status: u8) -> bool {
        self.skip[usize::from(status)]
    }

    #[inline]
    pub fn shows(&self, event: &DecodedEvent) -> bool {
        !self.is_skipped(event.status())
    }

    /// Skipped status bytes in ascending order.
    pub fn skipped(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|&status| self.is_skipped(status))
    }
}
