#![doc(html_root_url = "https://docs.rs/h2wire/latest")]
//! Public API for the `h2wire` library.
//!
//! This crate encodes and decodes the frames of a length-prefixed,
//! multiplexed stream protocol built around a nine-byte header: DATA,
//! HEADERS, PRIORITY, RST_STREAM, SETTINGS, PUSH_PROMISE, PING, GOAWAY,
//! WINDOW_UPDATE, CONTINUATION, ALTSVC, and a verbatim fallback for
//! unregistered types.
//!
//! The codec performs no I/O and keeps no connection state. Deciding which
//! frames are legal when, flow control, and header compression belong to
//! the caller.

pub mod byte_order;
pub mod codec;
pub mod error;
pub mod flags;
pub mod frame;

pub use codec::{CodecConfig, FrameCodec, encode, explain, parse_body, parse_header};
pub use error::{FrameError, InvalidData, MalformedFrame};
pub use flags::{Flag, FlagSet};
pub use frame::{Frame, FrameHeader, FrameType, StreamAssociation};
