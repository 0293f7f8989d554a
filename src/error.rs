//! Error types for frame encoding and decoding.
//!
//! Failures fall into four categories:
//!
//! - [`FrameError::UnknownFrame`]: the type byte is not registered and strict parsing was
//!   requested.
//! - [`MalformedFrame`]: the body has the wrong size for a fixed field, or too few bytes remain to
//!   read a mandatory sub-field.
//! - [`FrameError::InvalidPadding`]: the declared pad length swallows the rest of the body.
//! - [`InvalidData`]: a well-formed field holds a value the protocol forbids.
//!
//! Every failure is fatal to the frame being processed. There is no partial
//! frame; callers are expected to tear down the enclosing connection.

use std::io;

use thiserror::Error;

/// Structural errors: a field does not fit the bytes available.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MalformedFrame {
    /// The frame header was not exactly nine bytes long.
    #[error("frame header must be 9 bytes, got {have}")]
    HeaderLength {
        /// Bytes supplied.
        have: usize,
    },

    /// A fixed-size body had the wrong length.
    #[error("{kind} frame body must be {expected} bytes, got {actual}")]
    BodyLength {
        /// Frame kind name.
        kind: &'static str,
        /// Required body length.
        expected: usize,
        /// Body length received.
        actual: usize,
    },

    /// Too few bytes remained to decode a mandatory field.
    #[error("{kind} frame too short for {field}: need {need} bytes, have {have}")]
    MissingField {
        /// Frame kind name.
        kind: &'static str,
        /// Field that could not be read.
        field: &'static str,
        /// Bytes needed to read the field.
        need: usize,
        /// Bytes remaining.
        have: usize,
    },

    /// A SETTINGS body was not a whole number of six-byte entries.
    #[error("SETTINGS body of {len} bytes is not a multiple of 6")]
    SettingsAlignment {
        /// Body length received.
        len: usize,
    },

    /// PING opaque data exceeded eight bytes.
    #[error("PING frame may not have more than 8 bytes of data, got {len}")]
    PingDataTooLong {
        /// Opaque data length supplied.
        len: usize,
    },

    /// An ALTSVC origin does not fit its 16-bit length prefix.
    #[error("ALTSVC origin of {len} bytes exceeds 65535")]
    OriginTooLong {
        /// Origin length supplied.
        len: usize,
    },

    /// A frame length exceeds what the wire or the codec allows.
    #[error("frame exceeds max length: {size} > {max}")]
    OversizedFrame {
        /// Body length declared or produced.
        size: usize,
        /// Maximum permitted body length.
        max: usize,
    },

    /// The buffer ended before the declared frame was complete.
    #[error("truncated frame: {have} of {expected} bytes available")]
    Truncated {
        /// Total bytes the frame requires, header included.
        expected: usize,
        /// Bytes available.
        have: usize,
    },
}

/// Semantic errors: a field is well formed but its value is forbidden.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidData {
    /// A frame that must belong to a stream was given stream 0.
    #[error("stream ID must be non-zero for {kind}")]
    StreamIdRequired {
        /// Frame kind name.
        kind: &'static str,
    },

    /// A connection-level frame was given a non-zero stream.
    #[error("stream ID must be zero for {kind}, got {stream_id}")]
    StreamIdForbidden {
        /// Frame kind name.
        kind: &'static str,
        /// Stream identifier supplied.
        stream_id: u32,
    },

    /// A stream identifier field had the reserved top bit set.
    #[error("{kind} {field} must fit in 31 bits, got {stream_id:#010x}")]
    StreamIdOutOfRange {
        /// Frame kind name.
        kind: &'static str,
        /// Field holding the identifier.
        field: &'static str,
        /// Value supplied.
        stream_id: u32,
    },

    /// A flag name outside the frame kind's legal set.
    #[error("unexpected flag: {flag}. Valid flags are: {legal}")]
    UnknownFlag {
        /// Flag name supplied.
        flag: String,
        /// Comma-separated legal flag names.
        legal: String,
    },

    /// A SETTINGS acknowledgement carried a payload.
    #[error("SETTINGS ack frame must not have payload: got {len} bytes")]
    AckWithPayload {
        /// Body length received.
        len: usize,
    },

    /// A SETTINGS frame combined the ACK flag with settings.
    #[error("SETTINGS must be empty if ACK flag is set, got {count} entries")]
    AckWithSettings {
        /// Number of settings supplied.
        count: usize,
    },

    /// A promised stream identifier was zero or odd.
    #[error("invalid PUSH_PROMISE promised stream id: {stream_id}")]
    PromisedStreamId {
        /// Promised stream identifier.
        stream_id: u32,
    },

    /// A window increment fell outside `1..=2^31-1`.
    #[error("WINDOW_UPDATE increment must be between 1 and 2^31-1, got {increment}")]
    WindowIncrement {
        /// Increment received or supplied.
        increment: u32,
    },
}

/// Top-level frame codec error.
///
/// # Examples
///
/// ```
/// use h2wire::{FrameError, InvalidData};
///
/// let err = FrameError::from(InvalidData::WindowIncrement { increment: 0 });
/// assert_eq!(err.error_type(), "invalid_data");
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The type byte is not registered and strict parsing was requested.
    #[error("unknown frame type {frame_type:#04x} with length {length}")]
    UnknownFrame {
        /// Type byte from the header.
        frame_type: u8,
        /// Declared body length.
        length: usize,
    },

    /// Structural error.
    #[error("malformed frame: {0}")]
    Malformed(#[from] MalformedFrame),

    /// The pad length leaves no room for the rest of the body.
    #[error("padding is too long: pad length {pad_length} in {body_len} byte body")]
    InvalidPadding {
        /// Declared pad length.
        pad_length: u8,
        /// Total body length.
        body_len: usize,
    },

    /// Semantic error.
    #[error("invalid frame data: {0}")]
    InvalidData(#[from] InvalidData),
}

impl FrameError {
    /// Returns the error category as a string for logging.
    ///
    /// # Returns
    ///
    /// One of: `"unknown_frame"`, `"malformed"`, `"padding"`, or `"invalid_data"`.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::UnknownFrame { .. } => "unknown_frame",
            Self::Malformed(_) => "malformed",
            Self::InvalidPadding { .. } => "padding",
            Self::InvalidData(_) => "invalid_data",
        }
    }

    pub(crate) fn missing_field(
        kind: &'static str,
        field: &'static str,
        need: usize,
        have: usize,
    ) -> Self {
        MalformedFrame::MissingField {
            kind,
            field,
            need,
            have,
        }
        .into()
    }

    pub(crate) fn body_length(kind: &'static str, expected: usize, actual: usize) -> Self {
        MalformedFrame::BodyLength {
            kind,
            expected,
            actual,
        }
        .into()
    }
}

impl From<FrameError> for io::Error {
    fn from(err: FrameError) -> Self { io::Error::new(io::ErrorKind::InvalidData, err) }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
