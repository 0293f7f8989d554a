//! DATA frames (type 0x0).

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::{FrameType, Padding, RawData, checked_stream_id};
use crate::{
    error::FrameError,
    flags::{DATA_FLAGS, FlagSet, PADDED},
};

/// Application payload for a stream, optionally padded.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use h2wire::{Frame, frame::Data};
///
/// let mut data = Data::new(1).expect("stream 1").with_flag("END_STREAM").expect("legal flag");
/// data.data = Bytes::from_static(b"hi");
/// let wire = Frame::from(data).serialize().expect("encode");
/// assert_eq!(&wire[..], b"\x00\x00\x02\x00\x01\x00\x00\x00\x01hi");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Data {
    stream_id: u32,
    body_len: usize,
    /// END_STREAM and PADDED.
    pub(crate) flags: FlagSet,
    /// Padding, written only when PADDED is set.
    pub padding: Padding,
    /// Payload bytes.
    pub data: Bytes,
}

frame_accessors!(Data);

impl Data {
    /// Create an empty DATA frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::Data, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(DATA_FLAGS),
            padding: Padding::default(),
            data: Bytes::new(),
        })
    }

    /// Bytes this frame counts against the flow-control window: the whole
    /// body, padding included.
    #[must_use]
    pub fn flow_controlled_length(&self) -> usize {
        let padding = if self.flags.contains(PADDED.name()) {
            usize::from(self.padding.pad_length) + 1
        } else {
            0
        };
        self.data.len() + padding
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        self.padding.encode_prefix(&self.flags, dst);
        dst.put_slice(&self.data);
        self.padding.encode_trailer(&self.flags, dst);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        let rest = self.padding.decode_prefix(&self.flags, body, FrameType::Data)?;
        let payload = self.padding.strip(rest, body.len())?;
        self.data = Bytes::copy_from_slice(payload);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pad_length={}, data={}",
            self.padding.pad_length,
            RawData(&self.data)
        )
    }
}
