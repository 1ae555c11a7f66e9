use std::fmt;

/// A single protocol version as carried on the wire.
///
/// Versions are plain ordered integers. During negotiation the working
/// version may transiently dip below [`ProtocolVersion::MIN_SUPPORTED`]
/// through sub-protocol demotion; the bounds checks in
/// [`crate::exchange`] reject such a session before any feature decision
/// trusts the value.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct ProtocolVersion(i32);

impl ProtocolVersion {
    /// The newest protocol version this implementation speaks.
    pub const CURRENT: Self = Self(31);

    /// The oldest protocol version this implementation accepts.
    pub const MIN_SUPPORTED: Self = Self(20);

    /// The highest peer advertisement tolerated on the wire.
    ///
    /// Anything above this is treated as line noise from a dirty remote
    /// shell rather than a future release.
    pub const MAX_ACCEPTED: Self = Self(40);

    /// Peers below this version trigger a non-fatal upgrade advisory.
    pub const OLD_ADVISORY: Self = Self(25);

    /// Our sub-protocol revision: nonzero only in pre-release builds that
    /// target a not-yet-finalized [`ProtocolVersion::CURRENT`].
    pub const SUB_PROTOCOL: i32 = 0;

    /// Wraps a raw wire integer without validation.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value of this version.
    #[must_use]
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Returns the version one step below this one.
    ///
    /// Used when sub-protocol reconciliation refuses to trust an
    /// advertised major version.
    #[must_use]
    pub const fn demoted(self) -> Self {
        Self(self.0 - 1)
    }

    /// Reports whether the version lies inside the supported wire range.
    #[must_use]
    pub const fn is_in_supported_range(self) -> bool {
        self.0 >= Self::MIN_SUPPORTED.0 && self.0 <= Self::MAX_ACCEPTED.0
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProtocolVersion {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<ProtocolVersion> for i32 {
    fn from(value: ProtocolVersion) -> Self {
        value.0
    }
}

impl PartialEq<i32> for ProtocolVersion {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

impl PartialEq<ProtocolVersion> for i32 {
    fn eq(&self, other: &ProtocolVersion) -> bool {
        *self == other.0
    }
}

impl PartialOrd<i32> for ProtocolVersion {
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl PartialOrd<ProtocolVersion> for i32 {
    fn partial_cmp(&self, other: &ProtocolVersion) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_ordered() {
        assert!(ProtocolVersion::MIN_SUPPORTED < ProtocolVersion::OLD_ADVISORY);
        assert!(ProtocolVersion::OLD_ADVISORY < ProtocolVersion::CURRENT);
        assert!(ProtocolVersion::CURRENT < ProtocolVersion::MAX_ACCEPTED);
    }

    #[test]
    fn demotion_steps_down_by_one() {
        assert_eq!(ProtocolVersion::new(30).demoted(), 29);
    }

    #[test]
    fn supported_range_is_inclusive() {
        assert!(ProtocolVersion::MIN_SUPPORTED.is_in_supported_range());
        assert!(ProtocolVersion::MAX_ACCEPTED.is_in_supported_range());
        assert!(!ProtocolVersion::new(19).is_in_supported_range());
        assert!(!ProtocolVersion::new(41).is_in_supported_range());
    }

    #[test]
    fn compares_directly_with_i32() {
        let version = ProtocolVersion::new(30);
        assert_eq!(version, 30);
        assert_eq!(30, version);
        assert!(version >= 29);
        assert!(version < 31);
    }

    #[test]
    fn display_matches_numeric_value() {
        assert_eq!(ProtocolVersion::new(28).to_string(), "28");
    }
}
