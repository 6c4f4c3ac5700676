//! The extension point: handlers that give meaning to rule keys.
//!
//! The compiler itself only understands `rules` and `oneOf`. Every other key
//! must be consumed by a registered [`RuleKeyHandler`], or compilation fails.

use crate::{CompileError, EffectSource, RawObject, RawValue, ReferenceRegistry, RuleBuilder, RuleCondition};

/// Consumes rule keys and contributes conditions, effects and references.
///
/// Handlers are invoked once per rule, in registration order, before the
/// structural keys are processed.
pub trait RuleKeyHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Inspect the rule and consume any keys this handler owns.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] when an owned key holds an invalid value; the
    /// whole compilation is aborted.
    fn apply(&self, ctx: &mut RuleContext<'_>) -> Result<(), CompileError>;
}

/// Keys of a raw rule not yet consumed, in authoring order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnhandledKeys {
    keys: Vec<String>,
}

impl UnhandledKeys {
    pub(crate) fn of(raw: &RawObject) -> Self {
        Self {
            keys: raw.keys().map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Mark `key` consumed. Returns whether it was still unhandled.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.keys.iter().position(|k| k == key) {
            Some(idx) => {
                self.keys.remove(idx);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.keys
    }
}

/// Everything a handler may see and touch while one rule compiles.
#[derive(Debug)]
pub struct RuleContext<'a> {
    path: &'a str,
    raw: &'a RawObject,
    unhandled: &'a mut UnhandledKeys,
    rule: &'a mut RuleBuilder,
    references: &'a mut ReferenceRegistry,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        path: &'a str,
        raw: &'a RawObject,
        unhandled: &'a mut UnhandledKeys,
        rule: &'a mut RuleBuilder,
        references: &'a mut ReferenceRegistry,
    ) -> Self {
        Self {
            path,
            raw,
            unhandled,
            rule,
            references,
        }
    }

    /// Path of the rule being compiled, e.g. `ruleSet[1].rules[0]`.
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// The raw rule object.
    #[must_use]
    pub fn raw(&self) -> &'a RawObject {
        self.raw
    }

    #[must_use]
    pub fn is_unhandled(&self, key: &str) -> bool {
        self.unhandled.contains(key)
    }

    #[must_use]
    pub fn unhandled(&self) -> &UnhandledKeys {
        self.unhandled
    }

    /// Consume `key` if still unhandled and return its raw value.
    pub fn take(&mut self, key: &str) -> Option<&'a RawValue> {
        if self.unhandled.remove(key) {
            self.raw.get(key)
        } else {
            None
        }
    }

    /// Consume `key` without reading it. Returns whether it was unhandled.
    pub fn consume(&mut self, key: &str) -> bool {
        self.unhandled.remove(key)
    }

    pub fn add_condition(&mut self, condition: RuleCondition) {
        self.rule.add_condition(condition);
    }

    pub fn add_effect(&mut self, effect: impl Into<EffectSource>) {
        self.rule.add_effect(effect);
    }

    /// The in-progress rule.
    #[must_use]
    pub fn rule(&self) -> &RuleBuilder {
        self.rule
    }

    /// The compile-time reference registry.
    pub fn references(&mut self) -> &mut ReferenceRegistry {
        self.references
    }

    /// Sub-path for diagnostics about `key` of this rule.
    #[must_use]
    pub fn key_path(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }
}
