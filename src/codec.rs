//! Frame-level encode and decode entry points.
//!
//! The functions here are the whole surface offered to a connection state
//! machine: [`encode`] a frame, [`parse_header`] to learn a frame's kind and
//! body length, then [`parse_body`] once that many bytes have been read.
//! [`explain`] combines the two for diagnostics.
//!
//! [`FrameCodec`] wraps the same steps as a `tokio_util` decoder and encoder
//! over in-memory buffers, with limits taken from [`CodecConfig`].
//!
//! # Error Handling
//!
//! Every call either returns a complete, valid frame or fails with a
//! [`FrameError`]. Any failure should be treated as fatal to the connection.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    error::{FrameError, MalformedFrame},
    flags::FlagSet,
    frame::{Extension, FRAME_HEADER_SIZE, Frame, FrameHeader, FrameType},
};

pub mod config;

pub use config::{CodecConfig, DEFAULT_MAX_FRAME_SIZE, MAX_MAX_FRAME_SIZE};

/// Serialise `frame`, header included.
///
/// The frame's recorded body length is updated to match the bytes produced.
///
/// # Errors
///
/// Returns an error if a field cannot be represented on the wire or holds a
/// value the decoder would reject.
///
/// # Examples
///
/// ```
/// use h2wire::{Frame, codec::encode, frame::Ping};
///
/// let mut ping = Frame::from(Ping::new(0).expect("connection-level frame"));
/// let wire = encode(&mut ping).expect("encode");
/// assert_eq!(wire.len(), 9 + 8);
/// assert_eq!(ping.body_len(), 8);
/// ```
pub fn encode(frame: &mut Frame) -> Result<Bytes, FrameError> { frame.serialize() }

/// Parse a nine-byte frame header into an empty frame shell and the declared
/// body length.
///
/// Flag bits not defined for the frame's kind are ignored. An unregistered
/// type byte fails with [`FrameError::UnknownFrame`] when `strict` is set and
/// otherwise yields an [`Extension`] frame carrying the raw flags byte.
///
/// # Errors
///
/// Returns an error if `header` is not nine bytes long, the type is unknown
/// in strict mode, or the stream ID is not allowed for the frame's kind.
///
/// # Examples
///
/// ```
/// use h2wire::codec::parse_header;
///
/// let (frame, length) = parse_header(&[0, 0, 8, 6, 1, 0, 0, 0, 0], true).expect("ping header");
/// assert_eq!(length, 8);
/// assert_eq!(frame.frame_type(), 0x6);
/// assert!(frame.flags().is_some_and(|flags| flags.contains("ACK")));
/// ```
pub fn parse_header(header: &[u8], strict: bool) -> Result<(Frame, usize), FrameError> {
    let bytes = <[u8; FRAME_HEADER_SIZE]>::try_from(header)
        .map_err(|_| MalformedFrame::HeaderLength { have: header.len() })?;
    let header = FrameHeader::decode(bytes);
    let length = header.body_len();

    let frame = match FrameType::from_u8(header.frame_type) {
        Some(kind) => shell_with_flags(kind, &header)?,
        None if strict => {
            return Err(FrameError::UnknownFrame {
                frame_type: header.frame_type,
                length,
            });
        }
        None => {
            tracing::debug!(
                frame_type = header.frame_type,
                length,
                "unregistered frame type, decoding as extension frame"
            );
            Extension::new(header.frame_type, header.stream_id, header.flags)?.into()
        }
    };
    Ok((frame, length))
}

fn shell_with_flags(kind: FrameType, header: &FrameHeader) -> Result<Frame, FrameError> {
    let mut frame = kind.shell(header.stream_id)?;
    let flags = FlagSet::from_bits(kind.legal_flags(), header.flags);
    let ignored = header.flags & !flags.bits();
    if ignored != 0 {
        tracing::trace!(
            frame_type = kind.name(),
            ignored_bits = ignored,
            "ignoring undefined flag bits"
        );
    }
    if let Some(slot) = frame.flags_mut() {
        *slot = flags;
    }
    Ok(frame)
}

/// Populate a frame shell from its body bytes.
///
/// `body` must be exactly the length returned by [`parse_header`]. The bytes
/// are copied, so the caller may reuse the buffer afterwards.
///
/// # Errors
///
/// Returns an error if the body is malformed, its padding is too long, or a
/// field holds a forbidden value.
pub fn parse_body(frame: &mut Frame, body: &[u8]) -> Result<(), FrameError> {
    frame.parse_body(body)
}

/// Parse one complete frame from the front of `buffer` for diagnostics.
///
/// Unregistered types decode as extension frames. Returns the frame and the
/// number of bytes consumed, header included. The parsed frame is logged at
/// debug level.
///
/// # Errors
///
/// Returns [`MalformedFrame::Truncated`] if `buffer` holds less than a full
/// frame, or any error from [`parse_header`] and [`parse_body`].
///
/// # Examples
///
/// ```
/// use h2wire::codec::explain;
///
/// let wire = b"\x00\x00\x02\x00\x01\x00\x00\x00\x01hi trailing";
/// let (frame, consumed) = explain(wire).expect("data frame");
/// assert_eq!(consumed, 11);
/// assert_eq!(
///     frame.to_string(),
///     "DataFrame(stream_id=1, flags=[END_STREAM]): pad_length=0, data=<hex:6869>"
/// );
/// ```
pub fn explain(buffer: &[u8]) -> Result<(Frame, usize), FrameError> {
    let (header, rest) = buffer.split_first_chunk::<FRAME_HEADER_SIZE>().ok_or(
        MalformedFrame::Truncated {
            expected: FRAME_HEADER_SIZE,
            have: buffer.len(),
        },
    )?;
    let (mut frame, length) = parse_header(header, false)?;
    let consumed = FRAME_HEADER_SIZE + length;
    let body = rest.get(..length).ok_or(MalformedFrame::Truncated {
        expected: consumed,
        have: buffer.len(),
    })?;
    frame.parse_body(body)?;
    tracing::debug!(%frame, consumed, "explained frame");
    Ok((frame, consumed))
}

/// `tokio_util` decoder and encoder for frames held in memory buffers.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use h2wire::codec::{CodecConfig, FrameCodec};
/// use tokio_util::codec::Decoder;
///
/// let mut codec = FrameCodec::new(CodecConfig::default());
/// let mut buf = BytesMut::from(&b"\x00\x00\x08\x06\x00\x00\x00\x00\x00"[..]);
/// assert!(codec.decode(&mut buf).expect("partial frame").is_none());
///
/// buf.extend_from_slice(&[0; 8]);
/// let frame = codec.decode(&mut buf).expect("complete frame").expect("frame");
/// assert_eq!(frame.frame_type(), 0x6);
/// assert!(buf.is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCodec {
    config: CodecConfig,
}

impl FrameCodec {
    /// Construct a codec, clamping the configured maximum frame size.
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config: config.max_frame_size(config.max_frame_size),
        }
    }

    /// Return the active configuration.
    #[must_use]
    pub const fn config(&self) -> &CodecConfig { &self.config }

    fn max_frame_size(&self) -> usize {
        usize::try_from(self.config.max_frame_size).unwrap_or(usize::MAX)
    }

    fn check_size(&self, size: usize) -> Result<(), FrameError> {
        let max = self.max_frame_size();
        if size > max {
            return Err(MalformedFrame::OversizedFrame { size, max }.into());
        }
        Ok(())
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(header) = src.first_chunk::<FRAME_HEADER_SIZE>() else {
            return Ok(None);
        };
        let length = FrameHeader::decode(*header).body_len();
        self.check_size(length)?;

        let total = FRAME_HEADER_SIZE + length;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let frame_bytes = src.split_to(total);
        let (header, body) = frame_bytes.split_at(FRAME_HEADER_SIZE);
        let (mut frame, _) = parse_header(header, self.config.strict)?;
        frame.parse_body(body)?;
        Ok(Some(frame))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let expected = src
            .first_chunk::<FRAME_HEADER_SIZE>()
            .map_or(FRAME_HEADER_SIZE, |header| {
                FRAME_HEADER_SIZE + FrameHeader::decode(*header).body_len()
            });
        tracing::debug!(
            expected,
            have = src.len(),
            "buffer ended mid-frame"
        );
        Err(FrameError::from(MalformedFrame::Truncated {
            expected,
            have: src.len(),
        })
        .into())
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, mut item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = item.serialize()?;
        self.check_size(item.body_len())?;
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
