//! Status/data byte classification.
//!
//! Every byte on the wire is one of two things: a status byte (high bit set)
//! that opens a new message, or a 7-bit data byte that extends the current one.

/// High bit that marks a status byte.
pub const STATUS_BIT: u8 = 0x80;

/// System real-time: timing clock, 24 per quarter note.
pub const TIMING_CLOCK: u8 = 0xF8;

/// System real-time: active sensing keep-alive.
pub const ACTIVE_SENSING: u8 = 0xFE;

#[inline]
pub fn is_status(byte: u8) -> bool {
    byte & STATUS_BIT != 0
}

#[inline]
pub fn is_data(byte: u8) -> bool {
    !is_status(byte)
}

/// Low nibble of a status byte.
#[inline]
pub fn channel_of(status: u8) -> u8 {
    status & 0x0F
}

/// High nibble of a status byte (0x8-0xf for real status bytes).
#[inline]
pub fn kind_of(status: u8) -> u8 {
    status >> 4
}
