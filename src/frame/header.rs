//! The fixed nine-byte frame header.
//!
//! ```text
//! bits:  24          8        8        1    31
//! field: length   |  type  | flags  | R | stream_id
//! ```
//!
//! The length is written as a 16-bit high part followed by an 8-bit low
//! part. The reserved bit is always written as zero and masked off on read.

use crate::byte_order::{
    STREAM_ID_MASK,
    join_frame_length,
    read_network_u16,
    read_network_u32,
    split_frame_length,
    write_network_u16,
    write_network_u32,
};

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 9;

/// Raw fields of a frame header.
///
/// # Examples
///
/// ```
/// use h2wire::frame::FrameHeader;
///
/// let header = FrameHeader {
///     length: 2,
///     frame_type: 0x0,
///     flags: 0x1,
///     stream_id: 1,
/// };
/// let bytes = header.encode();
/// assert_eq!(bytes, [0, 0, 2, 0, 1, 0, 0, 0, 1]);
/// assert_eq!(FrameHeader::decode(bytes), header);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    /// Body length in bytes, excluding the header (24 bits on the wire).
    pub length: u32,
    /// Frame type byte.
    pub frame_type: u8,
    /// Flags byte.
    pub flags: u8,
    /// Stream identifier (31 bits on the wire).
    pub stream_id: u32,
}

impl FrameHeader {
    /// Serialise the header. Length bits above 24 and the reserved stream bit
    /// are discarded.
    #[must_use]
    pub fn encode(&self) -> [u8; FRAME_HEADER_SIZE] {
        let (high, low) = split_frame_length(self.length);
        let [h0, h1] = write_network_u16(high);
        let [s0, s1, s2, s3] = write_network_u32(self.stream_id & STREAM_ID_MASK);
        [h0, h1, low, self.frame_type, self.flags, s0, s1, s2, s3]
    }

    /// Parse a header, clearing the reserved stream bit.
    #[must_use]
    pub fn decode(bytes: [u8; FRAME_HEADER_SIZE]) -> Self {
        let [h0, h1, low, frame_type, flags, s0, s1, s2, s3] = bytes;
        Self {
            length: join_frame_length(read_network_u16([h0, h1]), low),
            frame_type,
            flags,
            stream_id: read_network_u32([s0, s1, s2, s3]) & STREAM_ID_MASK,
        }
    }

    /// Declared body length as a `usize`.
    #[must_use]
    pub fn body_len(&self) -> usize {
        usize::try_from(self.length).unwrap_or(usize::MAX)
    }
}
