use thiserror::Error;

use super::raw::RawValue;

/// Failure raised by a user-supplied [`Predicate`](super::Predicate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure raised while producing effects at classification time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EffectError {
    message: String,
}

impl EffectError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by [`RuleSet::exec`](super::RuleSet::exec).
///
/// The engine has no failure modes of its own; both variants carry errors
/// raised by user callbacks, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    Effect(#[from] EffectError),
}

/// Every way compiling a rule set can fail.
///
/// Each variant carries the dotted/bracketed `path` of the offending rule or
/// condition (e.g. `ruleSet[1].oneOf[0].test.and[2]`) and, where one exists,
/// the raw value found there.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("expected condition but got falsy value (at {path}: {value})")]
    FalsyCondition { path: String, value: RawValue },

    #[error("unexpected {found} when {expected} was expected (at {path}: {value})")]
    UnexpectedType {
        path: String,
        expected: &'static str,
        found: &'static str,
        value: RawValue,
    },

    #[error("unexpected property '{key}' in condition (at {path}: {value})")]
    UnknownConditionKey {
        path: String,
        key: String,
        value: RawValue,
    },

    #[error("array expected (at {path}: {value})")]
    ExpectedArray { path: String, value: RawValue },

    #[error("expected condition, but got empty thing (at {path}: {value})")]
    EmptyCondition { path: String, value: RawValue },

    #[error("predicate failed when probed with the empty string (at {path}): {source}")]
    PredicateProbe {
        path: String,
        #[source]
        source: PredicateError,
    },

    #[error("rule must be an object, got {found} (at {path}: {value})")]
    RuleNotObject {
        path: String,
        found: &'static str,
        value: RawValue,
    },

    #[error("properties {} are unknown (at {path}: {value})", .keys.join(", "))]
    UnknownProperties {
        path: String,
        keys: Vec<String>,
        value: RawValue,
    },

    #[error("{message} (at {path}: {value})")]
    InvalidProperty {
        path: String,
        message: String,
        value: RawValue,
    },
}

impl CompileError {
    /// Location of the failure inside the rule set.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            CompileError::FalsyCondition { path, .. }
            | CompileError::UnexpectedType { path, .. }
            | CompileError::UnknownConditionKey { path, .. }
            | CompileError::ExpectedArray { path, .. }
            | CompileError::EmptyCondition { path, .. }
            | CompileError::PredicateProbe { path, .. }
            | CompileError::RuleNotObject { path, .. }
            | CompileError::UnknownProperties { path, .. }
            | CompileError::InvalidProperty { path, .. } => path,
        }
    }

    /// Return a help message suggesting how to fix this error, if applicable.
    #[must_use]
    pub fn help(&self) -> Option<String> {
        match self {
            CompileError::UnknownConditionKey { key, .. } => Some(format!(
                "condition objects only accept 'and', 'or' and 'not' (got '{key}')"
            )),
            CompileError::EmptyCondition { .. } => Some(
                "add an 'and', 'or' or 'not' key, or use [] for a condition that never matches"
                    .into(),
            ),
            CompileError::UnknownProperties { keys, .. } => Some(format!(
                "no registered handler consumes {}; check for typos or register a handler",
                keys.iter()
                    .map(|k| format!("'{k}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            CompileError::ExpectedArray { .. } => {
                Some("'and', 'or', 'rules' and 'oneOf' take a list".into())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_properties_lists_every_key() {
        let err = CompileError::UnknownProperties {
            path: "ruleSet[0]".into(),
            keys: vec!["bogus".into(), "other".into()],
            value: RawValue::Null,
        };
        assert_eq!(
            err.to_string(),
            "properties bogus, other are unknown (at ruleSet[0]: null)"
        );
        assert_eq!(err.path(), "ruleSet[0]");
    }

    #[test]
    fn falsy_condition_message() {
        let err = CompileError::FalsyCondition {
            path: "ruleSet[0].test".into(),
            value: RawValue::Bool(false),
        };
        assert_eq!(
            err.to_string(),
            "expected condition but got falsy value (at ruleSet[0].test: false)"
        );
    }

    #[test]
    fn unexpected_type_message() {
        let err = CompileError::UnexpectedType {
            path: "ruleSet[2].issuer".into(),
            expected: "condition",
            found: "number",
            value: RawValue::Int(7),
        };
        assert_eq!(
            err.to_string(),
            "unexpected number when condition was expected (at ruleSet[2].issuer: 7)"
        );
    }

    #[test]
    fn predicate_probe_keeps_source() {
        let err = CompileError::PredicateProbe {
            path: "ruleSet[0].test".into(),
            source: PredicateError::new("boom"),
        };
        assert_eq!(
            err.to_string(),
            "predicate failed when probed with the empty string (at ruleSet[0].test): boom"
        );
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("boom"));
    }

    #[test]
    fn help_for_unknown_condition_key() {
        let err = CompileError::UnknownConditionKey {
            path: "ruleSet[0].test.xor".into(),
            key: "xor".into(),
            value: RawValue::Null,
        };
        assert!(err.help().is_some_and(|h| h.contains("'xor'")));
    }

    #[test]
    fn exec_error_is_transparent() {
        let err = ExecError::from(EffectError::new("loader list unavailable"));
        assert_eq!(err.to_string(), "loader list unavailable");
    }
}
