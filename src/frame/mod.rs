//! Frame model: the closed set of frame kinds and the type-byte registry.
//!
//! Every frame on the wire starts with a nine-byte [`FrameHeader`] whose type
//! byte selects one of the kinds below. Known type bytes map to a
//! [`FrameType`] through a table built at compile time; anything else is
//! either rejected or carried verbatim as an [`Extension`] frame, depending on
//! the caller's strictness.

use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::{
    byte_order::{MAX_FRAME_LENGTH, STREAM_ID_MASK},
    error::{FrameError, InvalidData, MalformedFrame},
    flags::{
        ACK_FLAGS,
        CONTINUATION_FLAGS,
        DATA_FLAGS,
        Flag,
        FlagSet,
        HEADERS_FLAGS,
        NO_FLAGS,
        PUSH_PROMISE_FLAGS,
    },
};

/// Implements the accessors shared by every flag-carrying frame kind.
macro_rules! frame_accessors {
    ($frame:ident) => {
        impl $frame {
            /// Return the stream identifier.
            #[must_use]
            pub const fn stream_id(&self) -> u32 { self.stream_id }

            /// Return the body length recorded by the last encode or parse.
            #[must_use]
            pub const fn body_len(&self) -> usize { self.body_len }

            pub(super) fn set_body_len(&mut self, len: usize) { self.body_len = len; }

            /// Return the flag set.
            #[must_use]
            pub const fn flags(&self) -> &crate::FlagSet { &self.flags }

            /// Set a flag by name.
            ///
            /// # Errors
            ///
            /// Returns [`InvalidData::UnknownFlag`](crate::InvalidData::UnknownFlag)
            /// if the flag is not legal for this frame kind.
            pub fn insert_flag(&mut self, name: &str) -> Result<(), crate::FrameError> {
                self.flags.insert(name)
            }

            /// Clear a flag by name. Names outside the legal set are ignored.
            pub fn remove_flag(&mut self, name: &str) { self.flags.remove(name); }

            /// Add a flag by name, returning the frame for chaining.
            ///
            /// # Errors
            ///
            /// Returns [`InvalidData::UnknownFlag`](crate::InvalidData::UnknownFlag)
            /// if the flag is not legal for this frame kind.
            pub fn with_flag(mut self, name: &str) -> Result<Self, crate::FrameError> {
                self.flags.insert(name)?;
                Ok(self)
            }
        }

        impl From<$frame> for crate::frame::Frame {
            fn from(frame: $frame) -> Self { Self::$frame(frame) }
        }
    };
}

mod altsvc;
mod control;
mod data;
mod extension;
pub mod header;
mod headers;
pub mod padding;
pub mod priority;
mod settings;

pub use altsvc::AltSvc;
pub use control::{GoAway, Ping, Priority, RstStream, WindowUpdate};
pub use data::Data;
pub use extension::Extension;
pub use header::{FRAME_HEADER_SIZE, FrameHeader};
pub use headers::{Continuation, Headers, PushPromise};
pub use padding::Padding;
pub use priority::{PRIORITY_BLOCK_SIZE, PriorityBlock};
pub use settings::{Setting, SettingId, Settings};

/// Whether a frame kind belongs to a stream, to the connection, or to either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamAssociation {
    /// The frame applies to the whole connection; stream ID must be zero.
    None,
    /// The frame belongs to a stream; stream ID must be non-zero.
    Required,
    /// Either is acceptable.
    Either,
}

impl StreamAssociation {
    /// Check `stream_id` against this association.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidData::StreamIdRequired`] or
    /// [`InvalidData::StreamIdForbidden`] on a mismatch.
    pub fn check(self, kind: &'static str, stream_id: u32) -> Result<(), FrameError> {
        match (self, stream_id) {
            (Self::Required, 0) => Err(InvalidData::StreamIdRequired { kind }.into()),
            (Self::None, id) if id != 0 => Err(InvalidData::StreamIdForbidden {
                kind,
                stream_id: id,
            }
            .into()),
            _ => Ok(()),
        }
    }
}

/// Registered frame types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    /// DATA (0x0).
    Data = 0x0,
    /// HEADERS (0x1).
    Headers = 0x1,
    /// PRIORITY (0x2).
    Priority = 0x2,
    /// RST_STREAM (0x3).
    RstStream = 0x3,
    /// SETTINGS (0x4).
    Settings = 0x4,
    /// PUSH_PROMISE (0x5).
    PushPromise = 0x5,
    /// PING (0x6).
    Ping = 0x6,
    /// GOAWAY (0x7).
    GoAway = 0x7,
    /// WINDOW_UPDATE (0x8).
    WindowUpdate = 0x8,
    /// CONTINUATION (0x9).
    Continuation = 0x9,
    /// ALTSVC (0xA).
    AltSvc = 0xA,
}

const REGISTERED: [FrameType; 11] = [
    FrameType::Data,
    FrameType::Headers,
    FrameType::Priority,
    FrameType::RstStream,
    FrameType::Settings,
    FrameType::PushPromise,
    FrameType::Ping,
    FrameType::GoAway,
    FrameType::WindowUpdate,
    FrameType::Continuation,
    FrameType::AltSvc,
];

static REGISTRY: [Option<FrameType>; 256] = build_registry();

const fn build_registry() -> [Option<FrameType>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < REGISTERED.len() {
        let kind = REGISTERED[i];
        table[kind as usize] = Some(kind);
        i += 1;
    }
    table
}

impl FrameType {
    /// Look up a wire type byte in the registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use h2wire::frame::FrameType;
    ///
    /// assert_eq!(FrameType::from_u8(0x6), Some(FrameType::Ping));
    /// assert_eq!(FrameType::from_u8(0xF0), None);
    /// ```
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Self> { REGISTRY[usize::from(byte)] }

    /// Return the wire type byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 { self as u8 }

    /// Return the protocol name of the frame type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Data => "DATA",
            Self::Headers => "HEADERS",
            Self::Priority => "PRIORITY",
            Self::RstStream => "RST_STREAM",
            Self::Settings => "SETTINGS",
            Self::PushPromise => "PUSH_PROMISE",
            Self::Ping => "PING",
            Self::GoAway => "GOAWAY",
            Self::WindowUpdate => "WINDOW_UPDATE",
            Self::Continuation => "CONTINUATION",
            Self::AltSvc => "ALTSVC",
        }
    }

    /// Return the stream association rule for this type.
    #[must_use]
    pub const fn association(self) -> StreamAssociation {
        match self {
            Self::Data
            | Self::Headers
            | Self::Priority
            | Self::RstStream
            | Self::PushPromise
            | Self::Continuation => StreamAssociation::Required,
            Self::Settings | Self::Ping | Self::GoAway => StreamAssociation::None,
            Self::WindowUpdate | Self::AltSvc => StreamAssociation::Either,
        }
    }

    /// Return the flags legal for this type.
    #[must_use]
    pub const fn legal_flags(self) -> &'static [Flag] {
        match self {
            Self::Data => DATA_FLAGS,
            Self::Headers => HEADERS_FLAGS,
            Self::Settings | Self::Ping => ACK_FLAGS,
            Self::PushPromise => PUSH_PROMISE_FLAGS,
            Self::Continuation => CONTINUATION_FLAGS,
            Self::Priority | Self::RstStream | Self::GoAway | Self::WindowUpdate | Self::AltSvc => {
                NO_FLAGS
            }
        }
    }

    /// Build an empty frame of this type, ready for [`Frame::parse_body`].
    pub(crate) fn shell(self, stream_id: u32) -> Result<Frame, FrameError> {
        Ok(match self {
            Self::Data => Data::new(stream_id)?.into(),
            Self::Headers => Headers::new(stream_id)?.into(),
            Self::Priority => Priority::new(stream_id)?.into(),
            Self::RstStream => RstStream::new(stream_id, 0)?.into(),
            Self::Settings => Settings::new(stream_id)?.into(),
            Self::PushPromise => PushPromise::new(stream_id)?.into(),
            Self::Ping => Ping::new(stream_id)?.into(),
            Self::GoAway => GoAway::new(stream_id)?.into(),
            Self::WindowUpdate => WindowUpdate::new(stream_id)?.into(),
            Self::Continuation => Continuation::new(stream_id)?.into(),
            Self::AltSvc => AltSvc::new(stream_id)?.into(),
        })
    }
}

/// Validate a stream identifier for construction.
///
/// The reserved bit is only cleared when reading the wire; a caller-supplied
/// identifier with it set is an error.
pub(crate) fn checked_stream_id(kind: FrameType, stream_id: u32) -> Result<u32, FrameError> {
    check_31_bit(kind.name(), "stream id", stream_id)?;
    kind.association().check(kind.name(), stream_id)?;
    Ok(stream_id)
}

/// Reject a stream identifier field that does not fit in 31 bits.
pub(crate) fn check_31_bit(
    kind: &'static str,
    field: &'static str,
    stream_id: u32,
) -> Result<u32, FrameError> {
    if stream_id > STREAM_ID_MASK {
        return Err(InvalidData::StreamIdOutOfRange {
            kind,
            field,
            stream_id,
        }
        .into());
    }
    Ok(stream_id)
}

/// A single frame of any kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// DATA frame.
    Data(Data),
    /// HEADERS frame.
    Headers(Headers),
    /// PRIORITY frame.
    Priority(Priority),
    /// RST_STREAM frame.
    RstStream(RstStream),
    /// SETTINGS frame.
    Settings(Settings),
    /// PUSH_PROMISE frame.
    PushPromise(PushPromise),
    /// PING frame.
    Ping(Ping),
    /// GOAWAY frame.
    GoAway(GoAway),
    /// WINDOW_UPDATE frame.
    WindowUpdate(WindowUpdate),
    /// CONTINUATION frame.
    Continuation(Continuation),
    /// ALTSVC frame.
    AltSvc(AltSvc),
    /// Frame of an unregistered type, carried verbatim.
    Extension(Extension),
}

impl Frame {
    /// Return the wire type byte.
    #[must_use]
    pub fn frame_type(&self) -> u8 {
        match self {
            Self::Extension(frame) => frame.frame_type(),
            _ => self.registered_type().map_or(0, FrameType::as_u8),
        }
    }

    /// Return the registered type, or `None` for an extension frame.
    #[must_use]
    pub fn registered_type(&self) -> Option<FrameType> {
        Some(match self {
            Self::Data(_) => FrameType::Data,
            Self::Headers(_) => FrameType::Headers,
            Self::Priority(_) => FrameType::Priority,
            Self::RstStream(_) => FrameType::RstStream,
            Self::Settings(_) => FrameType::Settings,
            Self::PushPromise(_) => FrameType::PushPromise,
            Self::Ping(_) => FrameType::Ping,
            Self::GoAway(_) => FrameType::GoAway,
            Self::WindowUpdate(_) => FrameType::WindowUpdate,
            Self::Continuation(_) => FrameType::Continuation,
            Self::AltSvc(_) => FrameType::AltSvc,
            Self::Extension(_) => return None,
        })
    }

    /// Return whether this frame belongs to a stream, the connection, or
    /// either. Extension frames accept either.
    #[must_use]
    pub fn stream_association(&self) -> StreamAssociation {
        self.registered_type()
            .map_or(StreamAssociation::Either, FrameType::association)
    }

    /// Return the stream identifier.
    #[must_use]
    pub fn stream_id(&self) -> u32 {
        match self {
            Self::Data(f) => f.stream_id(),
            Self::Headers(f) => f.stream_id(),
            Self::Priority(f) => f.stream_id(),
            Self::RstStream(f) => f.stream_id(),
            Self::Settings(f) => f.stream_id(),
            Self::PushPromise(f) => f.stream_id(),
            Self::Ping(f) => f.stream_id(),
            Self::GoAway(f) => f.stream_id(),
            Self::WindowUpdate(f) => f.stream_id(),
            Self::Continuation(f) => f.stream_id(),
            Self::AltSvc(f) => f.stream_id(),
            Self::Extension(f) => f.stream_id(),
        }
    }

    /// Return the body length recorded by the last encode or parse.
    #[must_use]
    pub fn body_len(&self) -> usize {
        match self {
            Self::Data(f) => f.body_len(),
            Self::Headers(f) => f.body_len(),
            Self::Priority(f) => f.body_len(),
            Self::RstStream(f) => f.body_len(),
            Self::Settings(f) => f.body_len(),
            Self::PushPromise(f) => f.body_len(),
            Self::Ping(f) => f.body_len(),
            Self::GoAway(f) => f.body_len(),
            Self::WindowUpdate(f) => f.body_len(),
            Self::Continuation(f) => f.body_len(),
            Self::AltSvc(f) => f.body_len(),
            Self::Extension(f) => f.body_len(),
        }
    }

    /// Return the flag set, or `None` for an extension frame whose flags are
    /// kept as a raw byte.
    #[must_use]
    pub fn flags(&self) -> Option<&FlagSet> {
        Some(match self {
            Self::Data(f) => &f.flags,
            Self::Headers(f) => &f.flags,
            Self::Priority(f) => &f.flags,
            Self::RstStream(f) => &f.flags,
            Self::Settings(f) => &f.flags,
            Self::PushPromise(f) => &f.flags,
            Self::Ping(f) => &f.flags,
            Self::GoAway(f) => &f.flags,
            Self::WindowUpdate(f) => &f.flags,
            Self::Continuation(f) => &f.flags,
            Self::AltSvc(f) => &f.flags,
            Self::Extension(_) => return None,
        })
    }

    /// Mutable access to the flag set; `None` for an extension frame.
    pub(crate) fn flags_mut(&mut self) -> Option<&mut FlagSet> {
        Some(match self {
            Self::Data(f) => &mut f.flags,
            Self::Headers(f) => &mut f.flags,
            Self::Priority(f) => &mut f.flags,
            Self::RstStream(f) => &mut f.flags,
            Self::Settings(f) => &mut f.flags,
            Self::PushPromise(f) => &mut f.flags,
            Self::Ping(f) => &mut f.flags,
            Self::GoAway(f) => &mut f.flags,
            Self::WindowUpdate(f) => &mut f.flags,
            Self::Continuation(f) => &mut f.flags,
            Self::AltSvc(f) => &mut f.flags,
            Self::Extension(_) => return None,
        })
    }

    /// Return the flags byte as it will be written to the wire.
    #[must_use]
    pub fn flag_byte(&self) -> u8 {
        match self {
            Self::Extension(f) => f.flag_byte,
            _ => self.flags().map_or(0, FlagSet::bits),
        }
    }

    /// Serialise the complete frame, header included.
    ///
    /// Records the length of the serialised body in [`body_len`](Self::body_len).
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be represented on the wire or holds a
    /// value the decoder would reject.
    pub fn serialize(&mut self) -> Result<Bytes, FrameError> {
        let mut body = BytesMut::new();
        self.encode_body(&mut body)?;
        let body_len = body.len();
        let length = u32::try_from(body_len)
            .ok()
            .filter(|len| *len <= MAX_FRAME_LENGTH)
            .ok_or(MalformedFrame::OversizedFrame {
                size: body_len,
                max: MAX_FRAME_LENGTH as usize,
            })?;
        self.set_body_len(body_len);

        let header = FrameHeader {
            length,
            frame_type: self.frame_type(),
            flags: self.flag_byte(),
            stream_id: self.stream_id(),
        };
        let mut out = BytesMut::with_capacity(FRAME_HEADER_SIZE + body_len);
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&body);
        Ok(out.freeze())
    }

    /// Populate the kind-specific fields from `body`.
    ///
    /// `body` must be exactly the number of bytes declared by the frame header.
    /// Fields that need the bytes are copied out, so the buffer may be reused
    /// once this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is malformed, the padding is too long, or
    /// a field holds a forbidden value.
    pub fn parse_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        match self {
            Self::Data(f) => f.decode_body(body),
            Self::Headers(f) => f.decode_body(body),
            Self::Priority(f) => f.decode_body(body),
            Self::RstStream(f) => f.decode_body(body),
            Self::Settings(f) => f.decode_body(body),
            Self::PushPromise(f) => f.decode_body(body),
            Self::Ping(f) => f.decode_body(body),
            Self::GoAway(f) => f.decode_body(body),
            Self::WindowUpdate(f) => f.decode_body(body),
            Self::Continuation(f) => f.decode_body(body),
            Self::AltSvc(f) => f.decode_body(body),
            Self::Extension(f) => f.decode_body(body),
        }?;
        self.set_body_len(body.len());
        Ok(())
    }

    fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        match self {
            Self::Data(f) => f.encode_body(dst),
            Self::Headers(f) => f.encode_body(dst),
            Self::Priority(f) => f.encode_body(dst),
            Self::RstStream(f) => f.encode_body(dst),
            Self::Settings(f) => f.encode_body(dst),
            Self::PushPromise(f) => f.encode_body(dst),
            Self::Ping(f) => f.encode_body(dst),
            Self::GoAway(f) => f.encode_body(dst),
            Self::WindowUpdate(f) => f.encode_body(dst),
            Self::Continuation(f) => f.encode_body(dst),
            Self::AltSvc(f) => f.encode_body(dst),
            Self::Extension(f) => f.encode_body(dst),
        }
    }

    fn set_body_len(&mut self, len: usize) {
        match self {
            Self::Data(f) => f.set_body_len(len),
            Self::Headers(f) => f.set_body_len(len),
            Self::Priority(f) => f.set_body_len(len),
            Self::RstStream(f) => f.set_body_len(len),
            Self::Settings(f) => f.set_body_len(len),
            Self::PushPromise(f) => f.set_body_len(len),
            Self::Ping(f) => f.set_body_len(len),
            Self::GoAway(f) => f.set_body_len(len),
            Self::WindowUpdate(f) => f.set_body_len(len),
            Self::Continuation(f) => f.set_body_len(len),
            Self::AltSvc(f) => f.set_body_len(len),
            Self::Extension(f) => f.set_body_len(len),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Data(_) => "DataFrame",
            Self::Headers(_) => "HeadersFrame",
            Self::Priority(_) => "PriorityFrame",
            Self::RstStream(_) => "RstStreamFrame",
            Self::Settings(_) => "SettingsFrame",
            Self::PushPromise(_) => "PushPromiseFrame",
            Self::Ping(_) => "PingFrame",
            Self::GoAway(_) => "GoAwayFrame",
            Self::WindowUpdate(_) => "WindowUpdateFrame",
            Self::Continuation(_) => "ContinuationFrame",
            Self::AltSvc(_) => "AltSvcFrame",
            Self::Extension(_) => "ExtensionFrame",
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(stream_id={}, flags=", self.kind_name(), self.stream_id())?;
        match self.flags() {
            Some(flags) => write!(f, "{flags}")?,
            None => write!(f, "{:#04x}", self.flag_byte())?,
        }
        f.write_str("): ")?;
        match self {
            Self::Data(frame) => frame.fmt_body(f),
            Self::Headers(frame) => frame.fmt_body(f),
            Self::Priority(frame) => frame.fmt_body(f),
            Self::RstStream(frame) => frame.fmt_body(f),
            Self::Settings(frame) => frame.fmt_body(f),
            Self::PushPromise(frame) => frame.fmt_body(f),
            Self::Ping(frame) => frame.fmt_body(f),
            Self::GoAway(frame) => frame.fmt_body(f),
            Self::WindowUpdate(frame) => frame.fmt_body(f),
            Self::Continuation(frame) => frame.fmt_body(f),
            Self::AltSvc(frame) => frame.fmt_body(f),
            Self::Extension(frame) => frame.fmt_body(f),
        }
    }
}

/// Renders an opaque byte field as truncated hex, or `None` when empty.
pub(crate) struct RawData<'a>(pub(crate) &'a [u8]);

impl fmt::Display for RawData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_HEX_CHARS: usize = 20;

        if self.0.is_empty() {
            return f.write_str("None");
        }
        f.write_str("<hex:")?;
        for byte in self.0.iter().take(MAX_HEX_CHARS / 2) {
            write!(f, "{byte:02x}")?;
        }
        if self.0.len() > MAX_HEX_CHARS / 2 {
            f.write_str("...")?;
        }
        f.write_str(">")
    }
}

/// Take a fixed-size field from the front of `body`.
pub(crate) fn take_array<'a, const N: usize>(
    body: &'a [u8],
    kind: FrameType,
    field: &'static str,
) -> Result<([u8; N], &'a [u8]), FrameError> {
    body.split_first_chunk::<N>()
        .map(|(head, rest)| (*head, rest))
        .ok_or_else(|| FrameError::missing_field(kind.name(), field, N, body.len()))
}

/// Require `body` to be exactly `N` bytes.
pub(crate) fn exact_array<const N: usize>(
    body: &[u8],
    kind: FrameType,
) -> Result<[u8; N], FrameError> {
    <[u8; N]>::try_from(body).map_err(|_| FrameError::body_length(kind.name(), N, body.len()))
}
