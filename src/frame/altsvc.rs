//! ALTSVC frames (type 0xA), advertising alternative services.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::{FrameType, checked_stream_id, take_array};
use crate::{
    byte_order::{read_network_u16, write_network_u16},
    error::{FrameError, MalformedFrame},
    flags::{FlagSet, NO_FLAGS},
};

/// Alternative service advertisement.
///
/// On stream 0 the origin names the advertised origin; on other streams it
/// is normally empty and the stream's own origin applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AltSvc {
    stream_id: u32,
    body_len: usize,
    /// No flags are defined.
    pub(crate) flags: FlagSet,
    /// ASCII origin; at most 65 535 bytes.
    pub origin: Bytes,
    /// Alt-Svc field value.
    pub field: Bytes,
}

frame_accessors!(AltSvc);

impl AltSvc {
    /// Create an ALTSVC frame with empty origin and field.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream association check fails. ALTSVC accepts
    /// both stream and connection scope, so any stream ID passes.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::AltSvc, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(NO_FLAGS),
            origin: Bytes::new(),
            field: Bytes::new(),
        })
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        let origin_len = u16::try_from(self.origin.len()).map_err(|_| {
            MalformedFrame::OriginTooLong {
                len: self.origin.len(),
            }
        })?;
        dst.put_slice(&write_network_u16(origin_len));
        dst.put_slice(&self.origin);
        dst.put_slice(&self.field);
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        let (origin_len, rest) = take_array::<2>(body, FrameType::AltSvc, "origin length")?;
        let origin_len = usize::from(read_network_u16(origin_len));
        if origin_len > rest.len() {
            return Err(FrameError::missing_field(
                FrameType::AltSvc.name(),
                "origin",
                origin_len,
                rest.len(),
            ));
        }
        let (origin, field) = rest.split_at(origin_len);
        self.origin = Bytes::copy_from_slice(origin);
        self.field = Bytes::copy_from_slice(field);
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "origin={:?}, field={:?}",
            String::from_utf8_lossy(&self.origin),
            String::from_utf8_lossy(&self.field)
        )
    }
}
