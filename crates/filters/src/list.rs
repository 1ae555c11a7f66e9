use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use crate::{FilterError, FilterRule};

/// One registered rule together with its compiled matcher and priority.
#[derive(Clone, Debug)]
struct CompiledRule {
    rule: FilterRule,
    priority: u32,
    matcher: GlobMatcher,
}

impl CompiledRule {
    fn new(rule: FilterRule, priority: u32) -> Result<Self, FilterError> {
        let expanded = if let Some(anchored) = rule.pattern.strip_prefix('/') {
            anchored.to_owned()
        } else if rule.no_prefix_expansion {
            rule.pattern.clone()
        } else {
            // Unanchored patterns match at any depth.
            format!("**/{}", rule.pattern)
        };

        let glob = GlobBuilder::new(&expanded)
            .literal_separator(true)
            .build()
            .map_err(|source| FilterError::new(rule.pattern.clone(), source))?;

        Ok(Self {
            matcher: glob.compile_matcher(),
            rule,
            priority,
        })
    }

    fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if self.rule.directory_only && !is_dir {
            return false;
        }
        self.matcher.is_match(path)
    }
}

/// Priority-ordered list of exclusion rules.
///
/// Rules are evaluated in ascending priority order with first-match-wins
/// semantics; rules registered with equal priority keep their registration
/// order. The list is mutable during session setup and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct FilterList {
    rules: Vec<CompiledRule>,
}

impl FilterList {
    /// Creates an empty rule list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `rule` and inserts it at the position dictated by `priority`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the pattern cannot be compiled into a
    /// glob matcher.
    pub fn register(&mut self, rule: FilterRule, priority: u32) -> Result<(), FilterError> {
        let compiled = CompiledRule::new(rule, priority)?;
        let at = self
            .rules
            .partition_point(|existing| existing.priority <= priority);
        self.rules.insert(at, compiled);
        Ok(())
    }

    /// Returns `true` when any registered rule matches `path`.
    #[must_use]
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        self.rules.iter().any(|rule| rule.matches(path, is_dir))
    }

    /// Returns the first matching rule for `path`, if any.
    #[must_use]
    pub fn matching_rule(&self, path: &Path, is_dir: bool) -> Option<&FilterRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(path, is_dir))
            .map(|compiled| &compiled.rule)
    }

    /// Returns an iterator over the registered rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(rules: &[(&str, u32)]) -> FilterList {
        let mut list = FilterList::new();
        for (pattern, priority) in rules {
            list.register(FilterRule::exclude(*pattern), *priority)
                .expect("pattern compiles");
        }
        list
    }

    #[test]
    fn unanchored_patterns_match_at_any_depth() {
        let list = list_with(&[("*.tmp", 0)]);
        assert!(list.matches(Path::new("a/b/c.tmp"), false));
        assert!(list.matches(Path::new("c.tmp"), false));
        assert!(!list.matches(Path::new("c.tmp/d"), false));
    }

    #[test]
    fn anchored_patterns_only_match_at_the_root() {
        let list = list_with(&[("/top.tmp", 0)]);
        assert!(list.matches(Path::new("top.tmp"), false));
        assert!(!list.matches(Path::new("nested/top.tmp"), false));
    }

    #[test]
    fn directory_only_rules_ignore_files() {
        let mut list = FilterList::new();
        list.register(
            FilterRule::exclude(".staging").with_directory_only(true),
            0,
        )
        .expect("pattern compiles");

        assert!(list.matches(Path::new("work/.staging"), true));
        assert!(!list.matches(Path::new("work/.staging"), false));
    }

    #[test]
    fn no_prefix_expansion_takes_the_pattern_literally() {
        let mut list = FilterList::new();
        list.register(
            FilterRule::exclude(".partial").with_no_prefix_expansion(true),
            0,
        )
        .expect("pattern compiles");

        assert!(list.matches(Path::new(".partial"), false));
        assert!(!list.matches(Path::new("deep/.partial"), false));
    }

    #[test]
    fn priority_orders_evaluation_and_ties_keep_registration_order() {
        let list = list_with(&[("b*", 5), ("a*", 1), ("c*", 5)]);
        let patterns: Vec<_> = list.iter().map(FilterRule::pattern).collect();
        assert_eq!(patterns, ["a*", "b*", "c*"]);
    }

    #[test]
    fn matching_rule_returns_the_first_hit() {
        let mut list = FilterList::new();
        list.register(FilterRule::exclude("*.log").with_perishable(true), 0)
            .expect("pattern compiles");
        list.register(FilterRule::exclude("*"), 1)
            .expect("pattern compiles");

        let rule = list
            .matching_rule(Path::new("build/out.log"), false)
            .expect("a rule matches");
        assert!(rule.is_perishable());
        assert_eq!(rule.pattern(), "*.log");
    }
}
