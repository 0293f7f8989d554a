//! Frames of unregistered types, carried verbatim.
//!
//! Produced only by non-strict header parsing. The flags byte is kept raw
//! because an unknown type has no legal flag list to interpret it against.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::{Frame, RawData, check_31_bit};
use crate::error::FrameError;

/// Unregistered frame whose type byte, flags byte and body round-trip
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension {
    frame_type: u8,
    stream_id: u32,
    body_len: usize,
    /// Raw flags byte.
    pub flag_byte: u8,
    /// Raw body.
    pub body: Bytes,
}

impl Extension {
    /// Create an extension frame with an empty body.
    ///
    /// Both stream and connection scope are accepted. Using a registered
    /// type byte produces bytes that decode as that registered kind, not as
    /// an extension.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` does not fit in 31 bits.
    pub fn new(frame_type: u8, stream_id: u32, flag_byte: u8) -> Result<Self, FrameError> {
        Ok(Self {
            frame_type,
            stream_id: check_31_bit("EXTENSION", "stream id", stream_id)?,
            body_len: 0,
            flag_byte,
            body: Bytes::new(),
        })
    }

    /// Return the raw type byte.
    #[must_use]
    pub const fn frame_type(&self) -> u8 { self.frame_type }

    /// Return the stream identifier.
    #[must_use]
    pub const fn stream_id(&self) -> u32 { self.stream_id }

    /// Return the body length recorded by the last encode or parse.
    #[must_use]
    pub const fn body_len(&self) -> usize { self.body_len }

    pub(super) fn set_body_len(&mut self, len: usize) { self.body_len = len; }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        dst.put_slice(&self.body);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        self.body = Bytes::copy_from_slice(body);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={:#04x}, flag_byte={:#04x}, body={}",
            self.frame_type,
            self.flag_byte,
            RawData(&self.body)
        )
    }
}

impl From<Extension> for Frame {
    fn from(frame: Extension) -> Self { Self::Extension(frame) }
}
