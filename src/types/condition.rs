use regex::Regex;

use super::error::PredicateError;
use super::raw::Predicate;

/// A compiled string test with its precomputed behavior on absent input.
///
/// Conditions are immutable after compilation. `match_when_empty` is what a
/// rule uses when the attribute a condition is bound to is missing from the
/// record; for leaf conditions it equals `test("")`.
#[derive(Debug, Clone)]
pub struct Condition {
    match_when_empty: bool,
    kind: ConditionKind,
}

#[derive(Debug, Clone)]
enum ConditionKind {
    Prefix(String),
    Pattern(Regex),
    Predicate(Predicate),
    Never,
    Any(Vec<Condition>),
    All(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Matches any value starting with `prefix`.
    #[must_use]
    pub fn prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            match_when_empty: prefix.is_empty(),
            kind: ConditionKind::Prefix(prefix),
        }
    }

    /// Matches any value the pattern finds a match in.
    #[must_use]
    pub fn pattern(pattern: Regex) -> Self {
        Self {
            match_when_empty: pattern.is_match(""),
            kind: ConditionKind::Pattern(pattern),
        }
    }

    /// Wrap a predicate whose empty-string result has already been probed.
    pub(crate) fn predicate(predicate: Predicate, match_when_empty: bool) -> Self {
        Self {
            match_when_empty,
            kind: ConditionKind::Predicate(predicate),
        }
    }

    /// A condition that never matches, not even absent values.
    #[must_use]
    pub fn never() -> Self {
        Self {
            match_when_empty: false,
            kind: ConditionKind::Never,
        }
    }

    /// OR over `conditions`. Empty input never matches.
    #[must_use]
    pub fn any(mut conditions: Vec<Condition>) -> Self {
        match conditions.len() {
            0 => Self::never(),
            1 => conditions.swap_remove(0),
            _ => Self {
                match_when_empty: conditions.iter().any(Condition::match_when_empty),
                kind: ConditionKind::Any(conditions),
            },
        }
    }

    /// AND over `conditions`. Empty input never matches.
    #[must_use]
    pub fn all(mut conditions: Vec<Condition>) -> Self {
        match conditions.len() {
            0 => Self::never(),
            1 => conditions.swap_remove(0),
            _ => Self {
                match_when_empty: conditions.iter().all(Condition::match_when_empty),
                kind: ConditionKind::All(conditions),
            },
        }
    }

    /// Logical inverse, including the absent-value behavior.
    #[must_use]
    pub fn negate(self) -> Self {
        Self {
            match_when_empty: !self.match_when_empty,
            kind: ConditionKind::Not(Box::new(self)),
        }
    }

    #[must_use]
    pub fn match_when_empty(&self) -> bool {
        self.match_when_empty
    }

    /// Test a present value.
    ///
    /// # Errors
    ///
    /// Only predicate leaves can fail; their error is returned unchanged.
    pub fn test(&self, value: &str) -> Result<bool, PredicateError> {
        match &self.kind {
            ConditionKind::Prefix(prefix) => Ok(value.starts_with(prefix.as_str())),
            ConditionKind::Pattern(re) => Ok(re.is_match(value)),
            ConditionKind::Predicate(p) => p.call(value),
            ConditionKind::Never => Ok(false),
            ConditionKind::Any(conditions) => {
                for c in conditions {
                    if c.test(value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ConditionKind::All(conditions) => {
                for c in conditions {
                    if !c.test(value)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ConditionKind::Not(inner) => Ok(!inner.test(value)?),
        }
    }
}
