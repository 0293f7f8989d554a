//! Helpers for exercising the `h2wire` codec in tests.
//!
//! Fixtures build wire bytes by hand so they stay independent of the encoder
//! and can describe input the encoder would refuse to produce. The codec
//! helpers push byte vectors through a [`FrameCodec`](h2wire::FrameCodec) and
//! collect what comes out.
//!
//! ```rust
//! use h2wire_testing::{decode_all, raw_frame};
//!
//! let wire = raw_frame(0x6, 0x1, 0, &[0; 8]);
//! let frames = decode_all(wire).expect("ping ack should decode");
//! assert_eq!(frames.len(), 1);
//! ```

pub mod codec_ext;
pub mod fixtures;

pub use codec_ext::{codec, decode_all, decode_with, encode_all};
pub use fixtures::{
    declared_length_wire,
    oversized_data_wire,
    padded_data_wire,
    raw_frame,
    truncated_body_wire,
};
