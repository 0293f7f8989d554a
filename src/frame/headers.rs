//! Header-block frames: HEADERS (0x1), PUSH_PROMISE (0x5) and
//! CONTINUATION (0x9).
//!
//! The header block itself is opaque here; compression is handled by the
//! layer above.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::{FrameType, Padding, PriorityBlock, RawData, checked_stream_id, take_array};
use crate::{
    byte_order::{STREAM_ID_MASK, read_network_u32, write_network_u32},
    error::{FrameError, InvalidData},
    flags::{CONTINUATION_FLAGS, FlagSet, HEADERS_FLAGS, PRIORITY, PUSH_PROMISE_FLAGS},
};

/// Opens a stream and carries the first header block fragment.
///
/// The priority block is written and read only when the PRIORITY flag is
/// set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Headers {
    stream_id: u32,
    body_len: usize,
    /// END_STREAM, END_HEADERS, PADDED and PRIORITY.
    pub(crate) flags: FlagSet,
    /// Padding, written only when PADDED is set.
    pub padding: Padding,
    /// Priority block, written only when PRIORITY is set.
    pub priority: PriorityBlock,
    /// Header block fragment.
    pub data: Bytes,
}

frame_accessors!(Headers);

impl Headers {
    /// Create an empty HEADERS frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::Headers, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(HEADERS_FLAGS),
            padding: Padding::default(),
            priority: PriorityBlock::default(),
            data: Bytes::new(),
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        self.padding.encode_prefix(&self.flags, dst);
        if self.flags.contains(PRIORITY.name()) {
            self.priority.encode(FrameType::Headers, dst)?;
        }
        dst.put_slice(&self.data);
        self.padding.encode_trailer(&self.flags, dst);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        let mut rest = self
            .padding
            .decode_prefix(&self.flags, body, FrameType::Headers)?;
        if self.flags.contains(PRIORITY.name()) {
            let (priority, after) = PriorityBlock::decode(rest, FrameType::Headers)?;
            self.priority = priority;
            rest = after;
        } else {
            self.priority = PriorityBlock::default();
        }
        let block = self.padding.strip(rest, body.len())?;
        self.data = Bytes::copy_from_slice(block);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exclusive={}, depends_on={}, weight={}, data={}",
            self.priority.exclusive,
            self.priority.depends_on,
            self.priority.weight,
            RawData(&self.data)
        )
    }
}

/// Announces a server-initiated stream ahead of its responses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushPromise {
    stream_id: u32,
    body_len: usize,
    /// END_HEADERS and PADDED.
    pub(crate) flags: FlagSet,
    /// Padding, written only when PADDED is set.
    pub padding: Padding,
    /// Stream reserved by the promise; must be non-zero and even.
    pub promised_stream_id: u32,
    /// Header block fragment.
    pub data: Bytes,
}

frame_accessors!(PushPromise);

impl PushPromise {
    /// Create an empty PUSH_PROMISE frame.
    ///
    /// The promised stream must be set before encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::PushPromise, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(PUSH_PROMISE_FLAGS),
            padding: Padding::default(),
            promised_stream_id: 0,
            data: Bytes::new(),
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        check_promised_stream_id(self.promised_stream_id)?;
        self.padding.encode_prefix(&self.flags, dst);
        dst.put_slice(&write_network_u32(self.promised_stream_id));
        dst.put_slice(&self.data);
        self.padding.encode_trailer(&self.flags, dst);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        let rest = self
            .padding
            .decode_prefix(&self.flags, body, FrameType::PushPromise)?;
        let (promised, rest) = take_array::<4>(rest, FrameType::PushPromise, "promised stream id")?;
        let promised_stream_id = read_network_u32(promised) & STREAM_ID_MASK;
        let block = self.padding.strip(rest, body.len())?;
        check_promised_stream_id(promised_stream_id)?;
        self.promised_stream_id = promised_stream_id;
        self.data = Bytes::copy_from_slice(block);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "promised_stream_id={}, data={}",
            self.promised_stream_id,
            RawData(&self.data)
        )
    }
}

fn check_promised_stream_id(stream_id: u32) -> Result<(), FrameError> {
    if stream_id == 0 || stream_id % 2 != 0 || stream_id > STREAM_ID_MASK {
        return Err(InvalidData::PromisedStreamId { stream_id }.into());
    }
    Ok(())
}

/// Continues a header block started by HEADERS or PUSH_PROMISE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Continuation {
    stream_id: u32,
    body_len: usize,
    /// END_HEADERS.
    pub(crate) flags: FlagSet,
    /// Header block fragment.
    pub data: Bytes,
}

frame_accessors!(Continuation);

impl Continuation {
    /// Create an empty CONTINUATION frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::Continuation, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(CONTINUATION_FLAGS),
            data: Bytes::new(),
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        dst.put_slice(&self.data);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        self.data = Bytes::copy_from_slice(body);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data={}", RawData(&self.data))
    }
}
