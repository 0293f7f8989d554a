//! SETTINGS frames (type 0x4).

use std::fmt;

use bytes::{BufMut, BytesMut};

use super::{FrameType, checked_stream_id};
use crate::{
    byte_order::{read_network_u16, read_network_u32, write_network_u16, write_network_u32},
    error::{FrameError, InvalidData, MalformedFrame},
    flags::{ACK, ACK_FLAGS, FlagSet},
};

/// Size of one encoded setting.
pub const SETTING_ENTRY_SIZE: usize = 6;

/// Identifier of a connection setting.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SettingId(pub u16);

impl SettingId {
    /// SETTINGS_HEADER_TABLE_SIZE.
    pub const HEADER_TABLE_SIZE: Self = Self(0x1);
    /// SETTINGS_ENABLE_PUSH.
    pub const ENABLE_PUSH: Self = Self(0x2);
    /// SETTINGS_MAX_CONCURRENT_STREAMS.
    pub const MAX_CONCURRENT_STREAMS: Self = Self(0x3);
    /// SETTINGS_INITIAL_WINDOW_SIZE.
    pub const INITIAL_WINDOW_SIZE: Self = Self(0x4);
    /// SETTINGS_MAX_FRAME_SIZE.
    pub const MAX_FRAME_SIZE: Self = Self(0x5);
    /// SETTINGS_MAX_HEADER_LIST_SIZE.
    pub const MAX_HEADER_LIST_SIZE: Self = Self(0x6);
    /// SETTINGS_ENABLE_CONNECT_PROTOCOL.
    pub const ENABLE_CONNECT_PROTOCOL: Self = Self(0x8);

    /// Return the protocol name for well-known identifiers.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0x1 => Some("HEADER_TABLE_SIZE"),
            0x2 => Some("ENABLE_PUSH"),
            0x3 => Some("MAX_CONCURRENT_STREAMS"),
            0x4 => Some("INITIAL_WINDOW_SIZE"),
            0x5 => Some("MAX_FRAME_SIZE"),
            0x6 => Some("MAX_HEADER_LIST_SIZE"),
            0x8 => Some("ENABLE_CONNECT_PROTOCOL"),
            _ => None,
        }
    }
}

impl From<u16> for SettingId {
    fn from(value: u16) -> Self { Self(value) }
}

impl From<SettingId> for u16 {
    fn from(value: SettingId) -> Self { value.0 }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#06x}", self.0),
        }
    }
}

/// One identifier/value pair.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Setting {
    /// Setting identifier.
    pub id: SettingId,
    /// Setting value.
    pub value: u32,
}

impl Setting {
    /// Create a setting.
    #[must_use]
    pub const fn new(id: SettingId, value: u32) -> Self { Self { id, value } }
}

/// Connection configuration, or an acknowledgement of the peer's.
///
/// Settings are kept in wire order; duplicates are preserved.
///
/// # Examples
///
/// ```
/// use h2wire::frame::{Setting, SettingId, Settings};
///
/// let frame = Settings::with_settings(
///     0,
///     vec![Setting::new(SettingId::ENABLE_PUSH, 0)],
///     &[],
/// )
/// .expect("valid settings");
/// assert_eq!(frame.get(SettingId::ENABLE_PUSH), Some(0));
///
/// assert!(Settings::with_settings(0, frame.settings.clone(), &["ACK"]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    stream_id: u32,
    body_len: usize,
    /// ACK.
    pub(crate) flags: FlagSet,
    /// Settings in wire order.
    pub settings: Vec<Setting>,
}

frame_accessors!(Settings);

impl Settings {
    /// Create an empty SETTINGS frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is non-zero.
    pub fn new(stream_id: u32) -> Result<Self, FrameError> {
        Ok(Self {
            stream_id: checked_stream_id(FrameType::Settings, stream_id)?,
            body_len: 0,
            flags: FlagSet::new(ACK_FLAGS),
            settings: Vec::new(),
        })
    }

    /// Create a SETTINGS acknowledgement.
    #[must_use]
    pub fn ack() -> Self {
        Self {
            stream_id: 0,
            body_len: 0,
            flags: FlagSet::from_bits(ACK_FLAGS, ACK.bit()),
            settings: Vec::new(),
        }
    }

    /// Create a SETTINGS frame with settings and flags.
    ///
    /// # Errors
    ///
    /// Returns an error if `stream_id` is non-zero, a flag is not legal, or
    /// the ACK flag is combined with a non-empty settings list.
    pub fn with_settings(
        stream_id: u32,
        settings: Vec<Setting>,
        flags: &[&str],
    ) -> Result<Self, FrameError> {
        let mut frame = Self::new(stream_id)?;
        for name in flags {
            frame.flags.insert(name)?;
        }
        frame.settings = settings;
        frame.check_ack()?;
        Ok(frame)
    }

    /// Return the last value sent for `id`.
    #[must_use]
    pub fn get(&self, id: SettingId) -> Option<u32> {
        self.settings
            .iter()
            .rev()
            .find(|setting| setting.id == id)
            .map(|setting| setting.value)
    }

    /// Report whether this frame acknowledges the peer's settings.
    #[must_use]
    pub fn is_ack(&self) -> bool { self.flags.contains(ACK.name()) }

    fn check_ack(&self) -> Result<(), FrameError> {
        if self.is_ack() && !self.settings.is_empty() {
            return Err(InvalidData::AckWithSettings {
                count: self.settings.len(),
            }
            .into());
        }
        Ok(())
    }

    pub(super) fn encode_body(&self, dst: &mut BytesMut) -> Result<(), FrameError> {
        self.check_ack()?;
        dst.reserve(self.settings.len() * SETTING_ENTRY_SIZE);
        for setting in &self.settings {
            dst.put_slice(&write_network_u16(setting.id.0));
            dst.put_slice(&write_network_u32(setting.value));
        }
        Ok(())
    }

    pub(super) fn decode_body(&mut self, body: &[u8]) -> Result<(), FrameError> {
        if self.is_ack() && !body.is_empty() {
            return Err(InvalidData::AckWithPayload { len: body.len() }.into());
        }
        if body.len() % SETTING_ENTRY_SIZE != 0 {
            return Err(MalformedFrame::SettingsAlignment { len: body.len() }.into());
        }
        let mut settings = Vec::with_capacity(body.len() / SETTING_ENTRY_SIZE);
        let mut rest = body;
        while let Some((entry, tail)) = rest.split_first_chunk::<SETTING_ENTRY_SIZE>() {
            let [i0, i1, v0, v1, v2, v3] = *entry;
            settings.push(Setting::new(
                SettingId(read_network_u16([i0, i1])),
                read_network_u32([v0, v1, v2, v3]),
            ));
            rest = tail;
        }
        self.settings = settings;
        Ok(())
    }

    pub(super) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("settings={")?;
        for (index, setting) in self.settings.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", setting.id, setting.value)?;
        }
        f.write_str("}")
    }
}
