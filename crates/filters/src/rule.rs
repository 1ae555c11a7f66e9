/// User-visible exclusion rule consisting of a pattern and matching flags.
///
/// Rules are built with [`FilterRule::exclude`] and refined through the
/// `with_*` builder methods before being handed to
/// [`FilterList::register`](crate::FilterList::register).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterRule {
    pub(crate) pattern: String,
    pub(crate) directory_only: bool,
    pub(crate) no_prefix_expansion: bool,
    pub(crate) perishable: bool,
}

impl FilterRule {
    /// Creates an exclusion rule for `pattern`.
    #[must_use]
    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            directory_only: false,
            no_prefix_expansion: false,
            perishable: false,
        }
    }

    /// Restricts the rule to directory entries.
    #[must_use]
    pub fn with_directory_only(mut self, directory_only: bool) -> Self {
        self.directory_only = directory_only;
        self
    }

    /// Takes the pattern text literally instead of expanding unanchored
    /// patterns to match at any depth.
    #[must_use]
    pub fn with_no_prefix_expansion(mut self, no_prefix_expansion: bool) -> Self {
        self.no_prefix_expansion = no_prefix_expansion;
        self
    }

    /// Marks the rule as perishable: it stops protecting a path once the
    /// enclosing directory is itself being removed.
    #[must_use]
    pub fn with_perishable(mut self, perishable: bool) -> Self {
        self.perishable = perishable;
        self
    }

    /// Returns the pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Reports whether the rule only applies to directories.
    #[must_use]
    pub const fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    /// Reports whether pattern-prefix expansion is suppressed.
    #[must_use]
    pub const fn is_no_prefix_expansion(&self) -> bool {
        self.no_prefix_expansion
    }

    /// Reports whether the rule is perishable.
    #[must_use]
    pub const fn is_perishable(&self) -> bool {
        self.perishable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builder_flags_default_to_false() {
        let rule = FilterRule::exclude("*.tmp");
        assert!(!rule.is_directory_only());
        assert!(!rule.is_no_prefix_expansion());
        assert!(!rule.is_perishable());
    }

    proptest! {
        #[test]
        fn perishable_flag_is_independent(
            pattern in "[a-z.*]{1,12}",
            perishable in any::<bool>(),
        ) {
            let rule = FilterRule::exclude(&pattern).with_perishable(perishable);
            prop_assert_eq!(rule.is_perishable(), perishable);
            prop_assert_eq!(rule.pattern(), pattern.as_str());
        }
    }
}
