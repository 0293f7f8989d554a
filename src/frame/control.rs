//! Fixed-layout control frames: PRIORITY (0x2), RST_STREAM (0x3),
//! PING (0x6), GOAWAY (0x7) and WINDOW_UPDATE (0x8).

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    FrameType,
    PRIORITY_BLOCK_SIZE,
    PriorityBlock,
    RawData,
    check_31_bit,
    checked_stream_id,
    exact_array,
    take_array,
};
use crate::{
    byte_order::{STREAM_ID_MASK, read_network_u32, write_network_u32},
    error::{FrameError, InvalidData, MalformedFrame},
    flags::{ACK_FLAGS, FlagSet, NO_FLAGS},
};

/// Size of a PING payload.
pub const PING_DATA_SIZE: usize = 8;

/// Largest legal window increment.
pub const MAX_WINDOW_INCREMENT: u32 = STREAM_ID_MASK;

/// Reprioritises a stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Priority {
    stream_id: u32,
    body_len: usize,
    /// No flags are defined.
    pub(crate) flags: FlagSet,
    /// Dependency, weight and exclusivity.
    pub priority: PriorityBlock,
}

frame_accessors!(Priority);

impl Priority {
    /// Create a PRIORITY frame with a default priority block.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::Priority, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(NO_FLAGS),
            priority: PriorityBlock::default(),
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        self.priority.encode(FrameType::Priority, dst)
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        if body.len() != PRIORITY_BLOCK_SIZE {
            return Err(FrameError::body_length(
                FrameType::Priority.name(),
                PRIORITY_BLOCK_SIZE,
                body.len(),
            ));
        }
        let (priority, _) = PriorityBlock::decode(body, FrameType::Priority)?;
        self.priority = priority;
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exclusive={}, depends_on={}, weight={}",
            self.priority.exclusive, self.priority.depends_on, self.priority.weight
        )
    }
}

/// Terminates a stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RstStream {
    stream_id: u32,
    body_len: usize,
    /// No flags are defined.
    pub(crate) flags: FlagSet,
    /// Reason for termination.
    pub error_code: u32,
}

frame_accessors!(RstStream);

impl RstStream {
    /// Create an RST_STREAM frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is zero.
    pub fn new(stream_id: u32, error_code: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::RstStream, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(NO_FLAGS),
            error_code,
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        dst.put_slice(&write_network_u32(self.error_code));
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        self.error_code = read_network_u32(exact_array::<4>(body, FrameType::RstStream)?);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error_code={}", self.error_code)
    }
}

/// Connection liveness check and round-trip timer.
///
/// The opaque data is always eight bytes; shorter input is zero-padded when
/// it is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ping {
    stream_id: u32,
    body_len: usize,
    /// ACK.
    pub(crate) flags: FlagSet,
    opaque_data: Bytes,
}

frame_accessors!(Ping);

impl Ping {
    /// Create a PING frame with zeroed opaque data.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is non-zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::Ping, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(ACK_FLAGS),
            opaque_data: Bytes::from_static(&[0; PING_DATA_SIZE]),
        })
    }

    /// Return the eight bytes of opaque data.
    #[must_use]
    pub fn opaque_data(&self) -> &Bytes { &self.opaque_data }

    /// Set the opaque data, zero-padding it to eight bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedFrame::PingDataTooLong`] if `data` is longer than
    /// eight bytes; the frame is left unchanged.
    pub fn set_opaque_data(&mut self, data: &[u8]) -> Result<(), FrameError> {
        let len = data.len();
        if len > PING_DATA_SIZE {
            return Err(MalformedFrame::PingDataTooLong { len }.into());
        }
        let mut padded = BytesMut::with_capacity(PING_DATA_SIZE);
        padded.put_slice(data);
        padded.put_bytes(0, PING_DATA_SIZE - len);
        self.opaque_data = padded.freeze();
        Ok(())
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        dst.put_slice(&self.opaque_data);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        let data = exact_array::<PING_DATA_SIZE>(body, FrameType::Ping)?;
        self.opaque_data = Bytes::copy_from_slice(&data);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opaque_data={}", RawData(&self.opaque_data))
    }
}

/// Initiates connection shutdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoAway {
    stream_id: u32,
    body_len: usize,
    /// No flags are defined.
    pub(crate) flags: FlagSet,
    /// Highest stream the sender may have processed (31 bits).
    pub last_stream_id: u32,
    /// Reason for shutdown.
    pub error_code: u32,
    /// Opaque debug data.
    pub additional_data: Bytes,
}

frame_accessors!(GoAway);

impl GoAway {
    /// Create a GOAWAY frame with zeroed fields.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is non-zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::GoAway, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(NO_FLAGS),
            last_stream_id: 0,
            error_code: 0,
            additional_data: Bytes::new(),
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        let last_stream_id = check_31_bit(
            FrameType::GoAway.name(),
            "last stream id",
            self.last_stream_id,
        )?;
        dst.put_slice(&write_network_u32(last_stream_id));
        dst.put_slice(&write_network_u32(self.error_code));
        dst.put_slice(&self.additional_data);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        let (fixed, rest) =
            take_array::<8>(body, FrameType::GoAway, "last stream id and error code")?;
        let [l0, l1, l2, l3, e0, e1, e2, e3] = fixed;
        self.last_stream_id = read_network_u32([l0, l1, l2, l3]) & STREAM_ID_MASK;
        self.error_code = read_network_u32([e0, e1, e2, e3]);
        self.additional_data = Bytes::copy_from_slice(rest);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "last_stream_id={}, error_code={}, additional_data={}",
            self.last_stream_id,
            self.error_code,
            RawData(&self.additional_data)
        )
    }
}

/// Grants flow-control credit to a stream or to the connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowUpdate {
    stream_id: u32,
    body_len: usize,
    /// No flags are defined.
    pub(crate) flags: FlagSet,
    /// Credit granted; must be within `1..=2^31-1`.
    pub window_increment: u32,
}

frame_accessors!(WindowUpdate);

impl WindowUpdate {
    /// Create a WINDOW_UPDATE frame.
    ///
    /// The increment must be set before encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream association check fails. WINDOW_UPDATE
    /// accepts both stream and connection scope, so any stream ID passes.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::WindowUpdate, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(NO_FLAGS),
            window_increment: 0,
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        check_window_increment(self.window_increment)?;
        dst.put_slice(&write_network_u32(self.window_increment));
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        let raw = exact_array::<4>(body, FrameType::WindowUpdate)?;
        let increment = read_network_u32(raw) & STREAM_ID_MASK;
        check_window_increment(increment)?;
        self.window_increment = increment;
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window_increment={}", self.window_increment)
    }
}

fn check_window_increment(increment: u32) -> Result<(), FrameError> {
    if (1..=MAX_WINDOW_INCREMENT).contains(&increment) {
        Ok(())
    } else {
        Err(InvalidData::WindowIncrement { increment }.into())
    }
}
