//! Raw wire fixtures.
//!
//! Every helper writes the nine-byte header itself: a 24-bit big-endian
//! length, the type byte, the flags byte, and a 31-bit stream identifier.

use h2wire::frame::FRAME_HEADER_SIZE;

fn header(length: usize, frame_type: u8, flags: u8, stream_id: u32) -> Vec<u8> {
    let length = u32::try_from(length).expect("fixture length fits in u32");
    assert!(length <= 0x00FF_FFFF, "fixture length exceeds 24 bits");
    let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + length as usize);
    buf.extend_from_slice(&length.to_be_bytes()[1..]);
    buf.push(frame_type);
    buf.push(flags);
    buf.extend_from_slice(&stream_id.to_be_bytes());
    buf
}

/// Build a frame with an arbitrary type, flags byte and body.
///
/// `stream_id` is written as given, so a set high bit lands in the reserved
/// position.
///
/// # Examples
///
/// ```rust
/// use h2wire_testing::raw_frame;
///
/// let wire = raw_frame(0x0, 0x1, 1, b"hi");
/// assert_eq!(wire, b"\x00\x00\x02\x00\x01\x00\x00\x00\x01hi");
/// ```
#[must_use]
pub fn raw_frame(frame_type: u8, flags: u8, stream_id: u32, body: &[u8]) -> Vec<u8> {
    let mut buf = header(body.len(), frame_type, flags, stream_id);
    buf.extend_from_slice(body);
    buf
}

/// Build a header declaring `length` body bytes with no body following.
#[must_use]
pub fn declared_length_wire(frame_type: u8, stream_id: u32, length: usize) -> Vec<u8> {
    header(length, frame_type, 0, stream_id)
}

/// Build a PADDED DATA frame on `stream_id` carrying `data` followed by
/// `pad_length` zero bytes.
#[must_use]
pub fn padded_data_wire(stream_id: u32, data: &[u8], pad_length: u8) -> Vec<u8> {
    let mut body = Vec::with_capacity(1 + data.len() + usize::from(pad_length));
    body.push(pad_length);
    body.extend_from_slice(data);
    body.resize(body.len() + usize::from(pad_length), 0);
    raw_frame(0x0, 0x8, stream_id, &body)
}

/// Build a DATA frame whose body is one byte longer than `max_frame_size`.
#[must_use]
pub fn oversized_data_wire(max_frame_size: usize) -> Vec<u8> {
    raw_frame(0x0, 0, 1, &vec![0xab; max_frame_size + 1])
}

/// Build a frame header that declares `body.len()` bytes but carry only the
/// first half of `body`.
#[must_use]
pub fn truncated_body_wire(frame_type: u8, stream_id: u32, body: &[u8]) -> Vec<u8> {
    let mut buf = header(body.len(), frame_type, 0, stream_id);
    buf.extend_from_slice(&body[..body.len() / 2]);
    buf
}
