//! Drive byte vectors through [`FrameCodec`].

use std::io;

use bytes::BytesMut;
use h2wire::{CodecConfig, Frame, FrameCodec};
use rstest::fixture;
use tokio_util::codec::{Decoder, Encoder};

/// Default codec: lenient about unknown types, 16 KiB frames.
#[fixture]
#[allow(
    unused_braces,
    reason = "Clippy is wrong here; this is not a redundant block"
)]
pub fn codec() -> FrameCodec { FrameCodec::new(CodecConfig::default()) }

/// Decode every frame in `bytes` with a default codec.
///
/// # Errors
///
/// Returns the first decode error, including truncation of a trailing frame.
pub fn decode_all(bytes: Vec<u8>) -> io::Result<Vec<Frame>> { decode_with(codec(), bytes) }

/// Decode every frame in `bytes` with `codec`.
///
/// Bytes left over after the last complete frame are reported through
/// `decode_eof`.
///
/// # Errors
///
/// Returns the first decode error, including truncation of a trailing frame.
///
/// ```rust
/// use h2wire::{CodecConfig, FrameCodec};
/// use h2wire_testing::{decode_with, raw_frame};
///
/// let strict = FrameCodec::new(CodecConfig::default().strict(true));
/// let err = decode_with(strict, raw_frame(0xEE, 0, 0, b""))
///     .expect_err("strict codec rejects unknown types");
/// assert!(err.to_string().contains("unknown frame type"));
/// ```
pub fn decode_with(mut codec: FrameCodec, bytes: Vec<u8>) -> io::Result<Vec<Frame>> {
    let mut buf = BytesMut::from(bytes.as_slice());
    let mut frames = Vec::new();
    while let Some(frame) = codec.decode(&mut buf)? {
        frames.push(frame);
    }
    if let Some(frame) = codec.decode_eof(&mut buf)? {
        frames.push(frame);
    }
    Ok(frames)
}

/// Encode `frames` back to back with `codec`.
///
/// # Errors
///
/// Returns the first encode error.
pub fn encode_all(
    mut codec: FrameCodec,
    frames: impl IntoIterator<Item = Frame>,
) -> io::Result<Vec<u8>> {
    let mut buf = BytesMut::new();
    for frame in frames {
        codec.encode(frame, &mut buf)?;
    }
    Ok(buf.to_vec())
}
