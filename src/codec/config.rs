//! Configuration for the buffer-level frame codec.

use crate::byte_order::MAX_FRAME_LENGTH;

/// Initial maximum frame size before any SETTINGS exchange (16 KiB).
///
/// This is also the smallest value a peer may advertise.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;

/// Largest value a peer may advertise (`2^24 - 1`).
pub const MAX_MAX_FRAME_SIZE: u32 = MAX_FRAME_LENGTH;

pub(crate) fn clamp_frame_size(value: u32) -> u32 {
    value.clamp(DEFAULT_MAX_FRAME_SIZE, MAX_MAX_FRAME_SIZE)
}

/// Decoding behaviour for [`FrameCodec`](crate::codec::FrameCodec).
///
/// # Examples
///
/// ```
/// use h2wire::codec::CodecConfig;
///
/// let config = CodecConfig::default().strict(true).max_frame_size(65_536);
///
/// assert!(config.strict);
/// assert_eq!(config.max_frame_size, 65_536);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Reject unregistered frame types instead of decoding them as
    /// extension frames.
    ///
    /// Default: false.
    pub strict: bool,

    /// Largest body accepted or produced, in bytes.
    ///
    /// Clamped to `[16 384, 16 777 215]`.
    ///
    /// Default: 16 384.
    pub max_frame_size: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl CodecConfig {
    /// Set whether unregistered frame types are rejected.
    #[must_use]
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Set the maximum frame size, clamped to the protocol's legal range.
    #[must_use]
    pub fn max_frame_size(mut self, size: u32) -> Self {
        self.max_frame_size = clamp_frame_size(size);
        self
    }
}
