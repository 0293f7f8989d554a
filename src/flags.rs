//! Named frame flags and per-kind flag sets.
//!
//! Each frame kind defines a fixed list of legal flags. A [`FlagSet`] is bound
//! to that list when it is created and refuses any other name, so a typo or a
//! flag borrowed from another kind is caught at the point of insertion rather
//! than silently lost on the wire.

use std::fmt;

use crate::error::{FrameError, InvalidData};

/// A named bit in a frame's flags byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    name: &'static str,
    bit: u8,
}

impl Flag {
    /// Create a flag from its name and bit.
    #[must_use]
    pub const fn new(name: &'static str, bit: u8) -> Self { Self { name, bit } }

    /// Return the flag name.
    #[must_use]
    pub const fn name(&self) -> &'static str { self.name }

    /// Return the flag's bit in the flags byte.
    #[must_use]
    pub const fn bit(&self) -> u8 { self.bit }
}

/// END_STREAM (0x1) on DATA and HEADERS.
pub const END_STREAM: Flag = Flag::new("END_STREAM", 0x01);
/// ACK (0x1) on SETTINGS and PING.
pub const ACK: Flag = Flag::new("ACK", 0x01);
/// END_HEADERS (0x4) on HEADERS, PUSH_PROMISE and CONTINUATION.
pub const END_HEADERS: Flag = Flag::new("END_HEADERS", 0x04);
/// PADDED (0x8) on DATA, HEADERS and PUSH_PROMISE.
pub const PADDED: Flag = Flag::new("PADDED", 0x08);
/// PRIORITY (0x20) on HEADERS.
pub const PRIORITY: Flag = Flag::new("PRIORITY", 0x20);

pub(crate) const NO_FLAGS: &[Flag] = &[];
pub(crate) const DATA_FLAGS: &[Flag] = &[END_STREAM, PADDED];
pub(crate) const HEADERS_FLAGS: &[Flag] = &[END_STREAM, END_HEADERS, PADDED, PRIORITY];
pub(crate) const ACK_FLAGS: &[Flag] = &[ACK];
pub(crate) const PUSH_PROMISE_FLAGS: &[Flag] = &[END_HEADERS, PADDED];
pub(crate) const CONTINUATION_FLAGS: &[Flag] = &[END_HEADERS];

/// Set of flags constrained to one frame kind's legal list.
///
/// # Examples
///
/// ```
/// use h2wire::flags::{END_STREAM, FlagSet, PADDED};
///
/// let mut flags = FlagSet::new(&[END_STREAM, PADDED]);
/// flags.insert("END_STREAM").expect("legal flag");
/// assert!(flags.contains("END_STREAM"));
/// assert!(flags.insert("ACK").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FlagSet {
    legal: &'static [Flag],
    bits: u8,
}

impl FlagSet {
    /// Create an empty set accepting only the given flags.
    #[must_use]
    pub const fn new(legal: &'static [Flag]) -> Self { Self { legal, bits: 0 } }

    /// Build a set from a wire flags byte.
    ///
    /// Bits that do not belong to a legal flag are dropped.
    #[must_use]
    pub fn from_bits(legal: &'static [Flag], byte: u8) -> Self {
        let bits = legal
            .iter()
            .filter(|flag| byte & flag.bit != 0)
            .fold(0, |acc, flag| acc | flag.bit);
        Self { legal, bits }
    }

    /// Return the flags byte for the flags present.
    #[must_use]
    pub const fn bits(&self) -> u8 { self.bits }

    /// Return the flags this set accepts.
    #[must_use]
    pub const fn legal(&self) -> &'static [Flag] { self.legal }

    /// Add a flag by name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidData::UnknownFlag`] if `name` is not legal for this set.
    pub fn insert(&mut self, name: &str) -> Result<(), FrameError> {
        let flag = self.lookup(name).ok_or_else(|| InvalidData::UnknownFlag {
            flag: name.to_owned(),
            legal: self.legal_names(),
        })?;
        self.bits |= flag.bit;
        Ok(())
    }

    /// Remove a flag by name. Unknown names are ignored.
    pub fn remove(&mut self, name: &str) {
        if let Some(flag) = self.lookup(name) {
            self.bits &= !flag.bit;
        }
    }

    /// Report whether the named flag is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|flag| self.bits & flag.bit != 0)
    }

    /// Iterate over the names of the flags present, in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.legal
            .iter()
            .filter(|flag| self.bits & flag.bit != 0)
            .map(Flag::name)
    }

    /// Number of flags present.
    #[must_use]
    pub fn len(&self) -> usize { self.iter().count() }

    /// Report whether no flags are present.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.bits == 0 }

    fn lookup(&self, name: &str) -> Option<&'static Flag> {
        self.legal.iter().find(|flag| flag.name == name)
    }

    fn legal_names(&self) -> String {
        let mut names: Vec<_> = self.legal.iter().map(Flag::name).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.iter().collect();
        names.sort_unstable();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::data(DATA_FLAGS, "ACK")]
    #[case::data_priority(DATA_FLAGS, "PRIORITY")]
    #[case::headers(HEADERS_FLAGS, "ACK")]
    #[case::settings(ACK_FLAGS, "END_STREAM")]
    #[case::push_promise(PUSH_PROMISE_FLAGS, "END_STREAM")]
    #[case::continuation(CONTINUATION_FLAGS, "PADDED")]
    #[case::flagless(NO_FLAGS, "END_STREAM")]
    #[case::lowercase(DATA_FLAGS, "end_stream")]
    fn illegal_flag_is_rejected(#[case] legal: &'static [Flag], #[case] name: &str) {
        let mut flags = FlagSet::new(legal);
        let err = flags.insert(name).expect_err("flag should be rejected");
        assert!(matches!(
            err,
            FrameError::InvalidData(InvalidData::UnknownFlag { ref flag, .. }) if flag == name
        ));
        assert!(flags.is_empty());
    }

    #[test]
    fn insert_and_remove_round_trip() {
        let mut flags = FlagSet::new(HEADERS_FLAGS);
        flags.insert("PRIORITY").expect("legal flag");
        flags.insert("END_STREAM").expect("legal flag");
        assert_eq!(flags.bits(), 0x21);
        assert_eq!(flags.len(), 2);
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            ["END_STREAM", "PRIORITY"]
        );

        flags.remove("PRIORITY");
        flags.remove("NOT_A_FLAG");
        assert!(!flags.contains("PRIORITY"));
        assert!(flags.contains("END_STREAM"));
    }

    #[test]
    fn from_bits_drops_unknown_bits() {
        let flags = FlagSet::from_bits(DATA_FLAGS, 0xFF);
        assert_eq!(flags.bits(), 0x09);
        assert!(flags.contains("END_STREAM"));
        assert!(flags.contains("PADDED"));
    }

    #[test]
    fn display_sorts_names() {
        let flags = FlagSet::from_bits(HEADERS_FLAGS, 0x2D);
        assert_eq!(
            flags.to_string(),
            "[END_HEADERS, END_STREAM, PADDED, PRIORITY]"
        );
    }

    #[test]
    fn rejection_lists_legal_flags() {
        let mut flags = FlagSet::new(DATA_FLAGS);
        let err = flags.insert("ACK").expect_err("flag should be rejected");
        assert!(err.to_string().contains("END_STREAM, PADDED"));
    }
}
