//! The five-byte priority block carried by PRIORITY frames and by HEADERS
//! frames with the PRIORITY flag.
//!
//! The exclusive bit shares the top bit of the 32-bit dependency field.

use bytes::{BufMut, BytesMut};

use super::{FrameType, check_31_bit, take_array};
use crate::{
    byte_order::{STREAM_ID_MASK, read_network_u32, write_network_u32},
    error::FrameError,
};

/// Size of an encoded priority block.
pub const PRIORITY_BLOCK_SIZE: usize = 5;

const EXCLUSIVE_BIT: u32 = 0x8000_0000;

/// Stream dependency, weight and exclusivity.
///
/// The weight is stored as its raw wire value; the protocol interprets it
/// as `weight + 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PriorityBlock {
    /// Stream this stream depends on (31 bits).
    pub depends_on: u32,
    /// Raw wire weight.
    pub weight: u8,
    /// Whether the dependency is exclusive.
    pub exclusive: bool,
}

impl PriorityBlock {
    /// Create a priority block.
    #[must_use]
    pub const fn new(depends_on: u32, weight: u8, exclusive: bool) -> Self {
        Self {
            depends_on,
            weight,
            exclusive,
        }
    }

    /// Write the block, rejecting a dependency that collides with the
    /// exclusive bit.
    pub(crate) fn encode(&self, kind: FrameType, dst: &mut BytesMut) -> Result<(), FrameError> {
        let depends_on = check_31_bit(kind.name(), "dependency", self.depends_on)?;
        let exclusive = if self.exclusive { EXCLUSIVE_BIT } else { 0 };
        dst.put_slice(&write_network_u32(depends_on | exclusive));
        dst.put_u8(self.weight);
        Ok(())
    }

    /// Read a priority block from the front of `body`, returning it with the
    /// remaining bytes.
    pub(crate) fn decode(body: &[u8], kind: FrameType) -> Result<(Self, &[u8]), FrameError> {
        let (block, rest) = take_array::<PRIORITY_BLOCK_SIZE>(body, kind, "priority block")?;
        let [d0, d1, d2, d3, weight] = block;
        let dependency = read_network_u32([d0, d1, d2, d3]);
        let priority = Self {
            depends_on: dependency & STREAM_ID_MASK,
            weight,
            exclusive: dependency & EXCLUSIVE_BIT != 0,
        };
        Ok((priority, rest))
    }
}
