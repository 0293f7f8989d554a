//! Optional padding carried by DATA, HEADERS and PUSH_PROMISE frames.
//!
//! When the PADDED flag is set the body begins with a one-byte pad length
//! and ends with that many zero bytes. Without the flag neither is present
//! and [`Padding::pad_length`] is ignored on encode.

use bytes::{BufMut, BytesMut};

use super::{FrameType, take_array};
use crate::{
    error::FrameError,
    flags::{FlagSet, PADDED},
};

/// Padding fields embedded in padded frame kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    /// Number of trailing zero bytes.
    pub pad_length: u8,
}

impl Padding {
    /// Create padding of the given length.
    #[must_use]
    pub const fn new(pad_length: u8) -> Self { Self { pad_length } }

    /// Write the pad length byte when PADDED is set.
    pub(crate) fn encode_prefix(self, flags: &FlagSet, dst: &mut BytesMut) {
        if is_padded(flags) {
            dst.put_u8(self.pad_length);
        }
    }

    /// Write the trailing zero bytes when PADDED is set.
    pub(crate) fn encode_trailer(self, flags: &FlagSet, dst: &mut BytesMut) {
        if is_padded(flags) {
            dst.put_bytes(0, usize::from(self.pad_length));
        }
    }

    /// Read the pad length byte when PADDED is set and return the rest of
    /// the body.
    pub(crate) fn decode_prefix<'a>(
        &mut self,
        flags: &FlagSet,
        body: &'a [u8],
        kind: FrameType,
    ) -> Result<&'a [u8], FrameError> {
        if !is_padded(flags) {
            self.pad_length = 0;
            return Ok(body);
        }
        let ([pad_length], rest) = take_array::<1>(body, kind, "pad length")?;
        self.pad_length = pad_length;
        Ok(rest)
    }

    /// Drop the trailing padding from `content`, the bytes left after the
    /// frame's fixed fields.
    ///
    /// Fails when the padding would consume the whole body or more bytes than
    /// remain after the fixed fields.
    pub(crate) fn strip<'a>(
        self,
        content: &'a [u8],
        body_len: usize,
    ) -> Result<&'a [u8], FrameError> {
        let pad = usize::from(self.pad_length);
        if (pad > 0 && pad >= body_len) || pad > content.len() {
            return Err(FrameError::InvalidPadding {
                pad_length: self.pad_length,
                body_len,
            });
        }
        Ok(&content[..content.len() - pad])
    }
}

fn is_padded(flags: &FlagSet) -> bool { flags.contains(PADDED.name()) }
