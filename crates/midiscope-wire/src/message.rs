//! Raw framed messages.

use crate::byte::{channel_of, is_status, kind_of};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// One framed message: a status byte followed by its data bytes, exactly as
/// they arrived.
///
/// The framer never validates contents, so a message built from stream
/// garbage may lack a leading status byte. Use [`has_status`](Self::has_status)
/// before trusting [`channel`](Self::channel) or [`kind`](Self::kind).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMessage {
    bytes: SmallVec<[u8; 3]>,
}

impl RawMessage {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    #[inline]
    pub fn has_status(&self) -> bool {
        self.first().is_some_and(is_status)
    }

    /// The leading status byte, if the message has one.
    #[inline]
    pub fn status(&self) -> Option<u8> {
        self.first().filter(|&b| is_status(b))
    }

    #[inline]
    pub fn channel(&self) -> Option<u8> {
        self.status().map(channel_of)
    }

    #[inline]
    pub fn kind(&self) -> Option<u8> {
        self.status().map(kind_of)
    }

    /// Everything after the first byte.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.bytes.get(1..).unwrap_or(&[])
    }
}

impl AsRef<[u8]> for RawMessage {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&[u8]> for RawMessage {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: SmallVec::from_slice(bytes),
        }
    }
}

impl From<Vec<u8>> for RawMessage {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: SmallVec::from_vec(bytes),
        }
    }
}

/// Lowercase hex, space separated: `90 3c 41`.
impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let msg = RawMessage::from(&[0x93, 60, 65][..]);
        assert_eq!(msg.len(), 3);
        assert!(msg.has_status());
        assert_eq!(msg.status(), Some(0x93));
        assert_eq!(msg.channel(), Some(3));
        assert_eq!(msg.kind(), Some(0x9));
        assert_eq!(msg.data(), &[60, 65]);
    }

    #[test]
    fn test_leading_data_byte_has_no_status() {
        let msg = RawMessage::from(vec![7, 7]);
        assert!(!msg.has_status());
        assert_eq!(msg.first(), Some(7));
        assert_eq!(msg.status(), None);
        assert_eq!(msg.channel(), None);
    }

    #[test]
    fn test_empty() {
        let msg = RawMessage::new();
        assert!(msg.is_empty());
        assert_eq!(msg.data(), &[] as &[u8]);
        assert_eq!(msg.to_string(), "");
    }

    #[test]
    fn test_hex_display() {
        let msg = RawMessage::from(&[0x90, 60, 5][..]);
        assert_eq!(msg.to_string(), "90 3c 05");
    }

    #[test]
    fn test_serializes_as_byte_list() {
        let msg = RawMessage::from(&[0xE0, 0, 64][..]);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, "[224,0,64]");
    }
}
