//! Helpers for explicit network byte-order conversions.
//!
//! Every multi-byte integer on the wire is big-endian. These helpers keep
//! Clippy expectations scoped to the conversion points so frame code can
//! remain explicit about wire endianness without repeating lint annotations.

/// Largest value representable by the 24-bit frame length field.
pub const MAX_FRAME_LENGTH: u32 = 0x00FF_FFFF;

/// Mask clearing the reserved top bit of a 31-bit stream identifier.
pub const STREAM_ID_MASK: u32 = 0x7FFF_FFFF;

/// Serialise a `u16` in network byte order (big-endian).
///
/// # Examples
///
/// ```
/// use h2wire::byte_order::write_network_u16;
///
/// assert_eq!(write_network_u16(0x1234), [0x12, 0x34]);
/// ```
#[must_use]
pub fn write_network_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use h2wire::byte_order::read_network_u16;
///
/// assert_eq!(read_network_u16([0x12, 0x34]), 0x1234);
/// ```
#[must_use]
pub fn read_network_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u16::from_be_bytes(bytes)
}

/// Serialise a `u32` in network byte order (big-endian).
///
/// # Examples
///
/// ```
/// use h2wire::byte_order::write_network_u32;
///
/// assert_eq!(write_network_u32(0x1234_5678), [0x12, 0x34, 0x56, 0x78]);
/// ```
#[must_use]
pub fn write_network_u32(value: u32) -> [u8; 4] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u32` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use h2wire::byte_order::read_network_u32;
///
/// assert_eq!(read_network_u32([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
/// ```
#[must_use]
pub fn read_network_u32(bytes: [u8; 4]) -> u32 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u32::from_be_bytes(bytes)
}

/// Split a 24-bit frame length into its historical 16-bit high and 8-bit
/// low wire fields.
///
/// Bits above the 24th are discarded; callers reject oversized lengths
/// before reaching the header.
///
/// # Examples
///
/// ```
/// use h2wire::byte_order::split_frame_length;
///
/// assert_eq!(split_frame_length(0x01_0203), (0x0102, 0x03));
/// ```
#[must_use]
pub fn split_frame_length(length: u32) -> (u16, u8) {
    let [_, high, mid, low] = write_network_u32(length);
    (read_network_u16([high, mid]), low)
}

/// Recombine the 16-bit high and 8-bit low wire fields into a frame length.
///
/// # Examples
///
/// ```
/// use h2wire::byte_order::join_frame_length;
///
/// assert_eq!(join_frame_length(0x0102, 0x03), 0x01_0203);
/// ```
#[must_use]
pub fn join_frame_length(high: u16, low: u8) -> u32 { (u32::from(high) << 8) | u32::from(low) }

#[cfg(test)]
mod tests {
    //! Conversion tests for network byte-order helpers.

    use rstest::rstest;

    use super::{
        MAX_FRAME_LENGTH,
        join_frame_length,
        read_network_u16,
        read_network_u32,
        split_frame_length,
        write_network_u16,
        write_network_u32,
    };

    /// Verify that each network-order write/read pair round-trips correctly.
    #[rstest]
    #[case::u16(
        0x1234u32,
        &write_network_u16(0x1234)[..],
        &[0x12, 0x34],
        u32::from(read_network_u16([0x12, 0x34]))
    )]
    #[case::u32(
        0x1234_5678u32,
        &write_network_u32(0x1234_5678)[..],
        &[0x12, 0x34, 0x56, 0x78],
        read_network_u32([0x12, 0x34, 0x56, 0x78])
    )]
    fn network_byte_order_round_trip(
        #[case] value: u32,
        #[case] written: &[u8],
        #[case] expected_bytes: &[u8],
        #[case] read_back: u32,
    ) {
        assert_eq!(written, expected_bytes);
        assert_eq!(read_back, value);
    }

    /// The 16+8 split must agree with a plain 3-byte big-endian write.
    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(0xFF)]
    #[case(0x100)]
    #[case(0xFFFF)]
    #[case(0x1_0000)]
    #[case(16_384)]
    #[case(MAX_FRAME_LENGTH)]
    fn length_split_matches_three_byte_encoding(#[case] length: u32) {
        let (high, low) = split_frame_length(length);
        let mut wire = Vec::with_capacity(3);
        wire.extend_from_slice(&write_network_u16(high));
        wire.push(low);

        let three_byte = &write_network_u32(length)[1..];
        assert_eq!(wire, three_byte);
        assert_eq!(join_frame_length(high, low), length);
    }
}
